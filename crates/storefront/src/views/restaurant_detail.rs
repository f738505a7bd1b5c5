//! Restaurant detail page: hero, delivery header, and the menu grid.

use nom_now_core::cart::{ADD_TO_CART_LABEL, OTHER_RESTAURANT_LABEL};
use nom_now_core::{MenuItem, Restaurant, RestaurantId, ViewState, can_add, menu_for_restaurant};

use super::{DeliveryOption, ReviewItemView, delivery_options};

/// State of the add-to-cart button on one menu card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCartButton {
    pub label: &'static str,
    pub disabled: bool,
}

impl AddToCartButton {
    /// The button for a dish from `restaurant_id`, given the current cart.
    #[must_use]
    pub fn for_cart(store: &ViewState, restaurant_id: RestaurantId) -> Self {
        if can_add(store.cart.items(), restaurant_id) {
            Self {
                label: ADD_TO_CART_LABEL,
                disabled: false,
            }
        } else {
            Self {
                label: OTHER_RESTAURANT_LABEL,
                disabled: true,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCardView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub food_type: Option<String>,
    pub food_image: Option<String>,
    pub href: String,
    pub button: AddToCartButton,
}

impl MenuCardView {
    fn new(item: &MenuItem, button: AddToCartButton) -> Self {
        Self {
            id: item.id.as_i32(),
            name: item.name.clone(),
            price: item.price.to_string(),
            food_type: item.food_type.clone(),
            food_image: item.food_image.clone(),
            href: format!("/menu-items/{}", item.id),
            button,
        }
    }
}

/// Everything shown once the restaurant has loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantPage {
    pub id: i32,
    pub name: String,
    pub hero_image: Option<String>,
    pub delivery_time: Option<String>,
    pub price_level: Option<String>,
    pub cuisine_type: Option<String>,
    pub address: String,
    pub business_hours: Option<String>,
    pub search_placeholder: String,
    pub delivery_options: Vec<DeliveryOption>,
    pub delivery_fee: String,
    pub menu: Vec<MenuCardView>,
    pub reviews: Vec<ReviewItemView>,
    pub reviews_url: String,
}

/// The three ways the detail page can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestaurantDetailView {
    Error(String),
    Loading,
    Loaded(Box<RestaurantPage>),
}

impl RestaurantDetailView {
    /// Render restaurant `id` from whatever the store holds.
    ///
    /// A stored error wins. A loaded restaurant with a different id counts
    /// as not loaded yet.
    #[must_use]
    pub fn from_store(store: &ViewState, id: RestaurantId) -> Self {
        if let Some(error) = &store.restaurants.error {
            return Self::Error(error.clone());
        }

        match &store.restaurants.current {
            Some(restaurant) if restaurant.id == id => {
                Self::Loaded(Box::new(RestaurantPage::new(store, restaurant)))
            }
            _ => Self::Loading,
        }
    }
}

impl RestaurantPage {
    fn new(store: &ViewState, restaurant: &Restaurant) -> Self {
        let button = AddToCartButton::for_cart(store, restaurant.id);
        let menu = menu_for_restaurant(&store.menu_items, restaurant.id)
            .into_iter()
            .map(|item| MenuCardView::new(item, button.clone()))
            .collect();

        Self {
            id: restaurant.id.as_i32(),
            name: restaurant.name.clone(),
            hero_image: restaurant.store_image.clone(),
            delivery_time: restaurant.delivery_time_label(),
            price_level: restaurant.price_level.clone(),
            cuisine_type: restaurant.cuisine_type.clone(),
            address: restaurant.full_address(),
            business_hours: restaurant.business_hours.clone(),
            search_placeholder: format!("Search in {}", restaurant.name),
            delivery_options: delivery_options(store.delivery_method),
            delivery_fee: restaurant.delivery_fee_label(),
            menu,
            reviews: store
                .reviews_for(restaurant.id)
                .iter()
                .map(ReviewItemView::from)
                .collect(),
            reviews_url: format!("/restaurants/{}/reviews", restaurant.id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nom_now_core::{Action, CartItem, DeliveryMethod};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::thunks::tests::{dish, restaurant};

    fn loaded(store: &ViewState, id: i32) -> RestaurantPage {
        match RestaurantDetailView::from_store(store, RestaurantId::new(id)) {
            RestaurantDetailView::Loaded(page) => *page,
            other => panic!("expected loaded page, got {other:?}"),
        }
    }

    fn store_with_menu() -> ViewState {
        let mut store = ViewState::default();
        store
            .dispatch(Action::LoadRestaurant(restaurant(1, "Taco Casa")))
            .unwrap();
        store
            .dispatch(Action::LoadMenuItems(vec![
                dish(1, 1, "Al Pastor", 399),
                dish(2, 2, "Pho", 1299),
                dish(3, 1, "Horchata", 250),
            ]))
            .unwrap();
        store
    }

    #[test]
    fn test_menu_only_lists_requested_restaurant() {
        let page = loaded(&store_with_menu(), 1);
        let names: Vec<_> = page.menu.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Al Pastor", "Horchata"]);
        assert_eq!(page.menu[0].href, "/menu-items/1");
        assert_eq!(page.menu[0].price, "$3.99");
    }

    #[test]
    fn test_header_labels() {
        let page = loaded(&store_with_menu(), 1);
        assert_eq!(page.search_placeholder, "Search in Taco Casa");
        assert_eq!(page.delivery_fee, "$2.99 Delivery Fee on $15+");
        assert_eq!(page.delivery_time.as_deref(), Some("25 min"));
        assert_eq!(page.address, "12 Elm St, Austin, TX 78701");
    }

    #[test]
    fn test_buttons_disabled_for_other_restaurant_cart() {
        let mut store = store_with_menu();
        store
            .dispatch(Action::AddToCart(CartItem::single(
                &dish(2, 2, "Pho", 1299),
                RestaurantId::new(2),
            )))
            .unwrap();

        let page = loaded(&store, 1);

        assert!(page.menu.iter().all(|m| m.button.disabled));
        assert_eq!(page.menu[0].button.label, OTHER_RESTAURANT_LABEL);
    }

    #[test]
    fn test_buttons_enabled_for_same_restaurant_cart() {
        let mut store = store_with_menu();
        store
            .dispatch(Action::AddToCart(CartItem::single(
                &dish(1, 1, "Al Pastor", 399),
                RestaurantId::new(1),
            )))
            .unwrap();

        let page = loaded(&store, 1);

        assert!(page.menu.iter().all(|m| !m.button.disabled));
        assert_eq!(page.menu[0].button.label, ADD_TO_CART_LABEL);
    }

    #[test]
    fn test_toggle_follows_shared_delivery_method() {
        let mut store = store_with_menu();
        store
            .dispatch(Action::SetDeliveryMethod(DeliveryMethod::Pickup))
            .unwrap();

        let page = loaded(&store, 1);
        let selected: Vec<_> = page
            .delivery_options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected, vec!["pickup"]);
    }

    #[test]
    fn test_error_and_loading_states() {
        let mut store = ViewState::default();
        assert_eq!(
            RestaurantDetailView::from_store(&store, RestaurantId::new(1)),
            RestaurantDetailView::Loading
        );

        store
            .dispatch(Action::LoadRestaurant(restaurant(2, "Pho Bar")))
            .unwrap();
        assert_eq!(
            RestaurantDetailView::from_store(&store, RestaurantId::new(1)),
            RestaurantDetailView::Loading
        );

        store
            .dispatch(Action::RestaurantFailed("Restaurant couldn't be found".into()))
            .unwrap();
        assert_eq!(
            RestaurantDetailView::from_store(&store, RestaurantId::new(1)),
            RestaurantDetailView::Error("Restaurant couldn't be found".into())
        );
    }
}
