//! The view-state store.
//!
//! Every page is rendered from a [`ViewState`]. Nothing writes to it directly;
//! handlers and thunks describe what happened as an [`Action`] and call
//! [`ViewState::dispatch`], which is the only place state changes.
//!
//! The visitor-owned slice (user, cart, delivery method, modal, notice) is
//! serialized into the session between requests. Data fetched from the
//! backend is marked `#[serde(skip)]` and reloaded per request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartError, CartItem};
use crate::review_form::{ReviewDraft, ReviewForm};
use crate::types::{
    DeliveryMethod, MenuItem, MenuItemId, Restaurant, RestaurantId, Review, ReviewId, User,
};

/// Content of the single modal slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modal {
    ReviewForm(ReviewForm),
}

/// Restaurant list plus the restaurant currently being viewed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantsState {
    pub list: Vec<Restaurant>,
    pub current: Option<Restaurant>,
    pub error: Option<String>,
}

/// Everything that happens to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetUser(User),
    RemoveUser,
    LoadRestaurants(Vec<Restaurant>),
    LoadRestaurant(Restaurant),
    RestaurantFailed(String),
    LoadMenuItems(Vec<MenuItem>),
    AddToCart(CartItem),
    RemoveFromCart(MenuItemId),
    ClearCart,
    SetDeliveryMethod(DeliveryMethod),
    LoadReviews {
        restaurant_id: RestaurantId,
        reviews: Vec<Review>,
    },
    RemoveReview(ReviewId),
    SetModalContent(Modal),
    CloseModal,
    /// Replace the open review form's field values.
    EditReview(ReviewDraft),
    /// Validate the open review form; it moves to `Submitting` or `Error`.
    SubmitReview,
    ReviewSucceeded,
    /// The backend answered with an `errors` payload.
    ReviewRejected(Option<String>),
    /// The create-review request failed outright.
    ReviewFailed,
    /// One-shot message for the next render, e.g. a rejected add-to-cart.
    Notify(String),
}

impl Action {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetUser(_) => "session/set_user",
            Self::RemoveUser => "session/remove_user",
            Self::LoadRestaurants(_) => "restaurants/load_all",
            Self::LoadRestaurant(_) => "restaurants/load_one",
            Self::RestaurantFailed(_) => "restaurants/failed",
            Self::LoadMenuItems(_) => "menu_items/load",
            Self::AddToCart(_) => "cart/add",
            Self::RemoveFromCart(_) => "cart/remove",
            Self::ClearCart => "cart/clear",
            Self::SetDeliveryMethod(_) => "delivery/set",
            Self::LoadReviews { .. } => "reviews/load",
            Self::RemoveReview(_) => "reviews/remove",
            Self::SetModalContent(_) => "modal/set",
            Self::CloseModal => "modal/close",
            Self::EditReview(_) => "review_form/edit",
            Self::SubmitReview => "review_form/submit",
            Self::ReviewSucceeded => "review_form/succeeded",
            Self::ReviewRejected(_) => "review_form/rejected",
            Self::ReviewFailed => "review_form/failed",
            Self::Notify(_) => "notice/set",
        }
    }
}

/// Per-visitor view state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub session_user: Option<User>,
    pub cart: Cart,
    pub delivery_method: DeliveryMethod,
    pub modal: Option<Modal>,
    pub notice: Option<String>,
    #[serde(skip)]
    pub restaurants: RestaurantsState,
    #[serde(skip)]
    pub menu_items: Vec<MenuItem>,
    #[serde(skip)]
    pub reviews: BTreeMap<RestaurantId, Vec<Review>>,
}

impl ViewState {
    /// Apply an action.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if an `AddToCart` would mix restaurants. The
    /// state is unchanged in that case.
    pub fn dispatch(&mut self, action: Action) -> Result<(), CartError> {
        match action {
            Action::SetUser(user) => self.session_user = Some(user),
            Action::RemoveUser => {
                self.session_user = None;
                self.cart.clear();
                self.modal = None;
            }
            Action::LoadRestaurants(list) => self.restaurants.list = list,
            Action::LoadRestaurant(restaurant) => {
                self.restaurants.current = Some(restaurant);
                self.restaurants.error = None;
            }
            Action::RestaurantFailed(message) => {
                self.restaurants.current = None;
                self.restaurants.error = Some(message);
            }
            Action::LoadMenuItems(items) => self.menu_items = items,
            Action::AddToCart(item) => self.cart.add(item)?,
            Action::RemoveFromCart(id) => {
                self.cart.remove(id);
            }
            Action::ClearCart => self.cart.clear(),
            Action::SetDeliveryMethod(method) => self.delivery_method = method,
            Action::LoadReviews {
                restaurant_id,
                reviews,
            } => {
                self.reviews.insert(restaurant_id, reviews);
            }
            Action::RemoveReview(id) => {
                for reviews in self.reviews.values_mut() {
                    reviews.retain(|review| review.id != id);
                }
            }
            Action::SetModalContent(modal) => self.modal = Some(modal),
            Action::CloseModal => self.modal = None,
            Action::EditReview(draft) => {
                if let Some(form) = self.review_form_mut() {
                    form.edit(draft);
                }
            }
            Action::SubmitReview => {
                if let Some(form) = self.review_form_mut() {
                    // The outcome is recorded in the form's status.
                    let _ = form.begin_submit();
                }
            }
            Action::ReviewSucceeded => {
                if let Some(form) = self.review_form_mut() {
                    form.succeed();
                }
            }
            Action::ReviewRejected(message) => {
                if let Some(form) = self.review_form_mut() {
                    form.fail(message);
                }
            }
            Action::ReviewFailed => {
                if let Some(form) = self.review_form_mut() {
                    form.fail_unexpected();
                }
            }
            Action::Notify(message) => self.notice = Some(message),
        }
        Ok(())
    }

    /// Reviews loaded for `restaurant_id`, empty if none were fetched.
    #[must_use]
    pub fn reviews_for(&self, restaurant_id: RestaurantId) -> &[Review] {
        self.reviews
            .get(&restaurant_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The open review form, if the modal holds one.
    #[must_use]
    pub const fn review_form(&self) -> Option<&ReviewForm> {
        match &self.modal {
            Some(Modal::ReviewForm(form)) => Some(form),
            None => None,
        }
    }

    pub const fn review_form_mut(&mut self) -> Option<&mut ReviewForm> {
        match &mut self.modal {
            Some(Modal::ReviewForm(form)) => Some(form),
            None => None,
        }
    }

    /// Consume the pending notice.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::menu_item::tests::dish;
    use crate::types::restaurant::tests::taco_casa;
    use crate::types::user::tests::demo_user;
    use crate::types::{OrderId, Rating};

    fn review(id: i32, restaurant: i32) -> Review {
        Review {
            id: ReviewId::new(id),
            user_id: None,
            restaurant_id: RestaurantId::new(restaurant),
            order_id: OrderId::new(id),
            review: "Tasty".to_string(),
            order_rating: Rating::new(4).unwrap(),
            restaurant_rating: Rating::new(4).unwrap(),
        }
    }

    #[test]
    fn test_add_to_cart_enforces_single_restaurant() {
        let mut state = ViewState::default();
        let first = CartItem::single(&dish(1, 1, "Al Pastor", 399), RestaurantId::new(1));
        let other = CartItem::single(&dish(2, 2, "Pho", 1299), RestaurantId::new(2));

        state.dispatch(Action::AddToCart(first)).unwrap();
        let err = state.dispatch(Action::AddToCart(other)).unwrap_err();

        assert!(matches!(err, CartError::OtherRestaurant { .. }));
        assert_eq!(state.cart.items().len(), 1);
    }

    #[test]
    fn test_restaurant_failure_replaces_current() {
        let mut state = ViewState::default();
        state.dispatch(Action::LoadRestaurant(taco_casa())).unwrap();
        state
            .dispatch(Action::RestaurantFailed("Restaurant couldn't be found".into()))
            .unwrap();

        assert_eq!(state.restaurants.current, None);
        assert_eq!(
            state.restaurants.error.as_deref(),
            Some("Restaurant couldn't be found")
        );

        state.dispatch(Action::LoadRestaurant(taco_casa())).unwrap();
        assert_eq!(state.restaurants.error, None);
    }

    #[test]
    fn test_remove_review_from_every_list() {
        let mut state = ViewState::default();
        state
            .dispatch(Action::LoadReviews {
                restaurant_id: RestaurantId::new(1),
                reviews: vec![review(1, 1), review(2, 1)],
            })
            .unwrap();

        state.dispatch(Action::RemoveReview(ReviewId::new(1))).unwrap();

        let ids: Vec<ReviewId> = state
            .reviews_for(RestaurantId::new(1))
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![ReviewId::new(2)]);
        assert!(state.reviews_for(RestaurantId::new(7)).is_empty());
    }

    #[test]
    fn test_logout_clears_cart_and_modal() {
        let mut state = ViewState::default();
        state.dispatch(Action::SetUser(demo_user())).unwrap();
        state
            .dispatch(Action::AddToCart(CartItem::single(
                &dish(1, 1, "Al Pastor", 399),
                RestaurantId::new(1),
            )))
            .unwrap();
        state
            .dispatch(Action::SetModalContent(Modal::ReviewForm(ReviewForm::new(
                RestaurantId::new(1),
                None,
            ))))
            .unwrap();

        state.dispatch(Action::RemoveUser).unwrap();

        assert_eq!(state.session_user, None);
        assert!(state.cart.is_empty());
        assert_eq!(state.modal, None);
    }

    #[test]
    fn test_review_form_actions_drive_modal_form() {
        let mut state = ViewState::default();
        state
            .dispatch(Action::SetModalContent(Modal::ReviewForm(ReviewForm::new(
                RestaurantId::new(1),
                Some(OrderId::new(3)),
            ))))
            .unwrap();

        state.dispatch(Action::SubmitReview).unwrap();
        assert_eq!(
            state.review_form().unwrap().error_message(),
            Some("Please write a review before submitting.")
        );

        state
            .dispatch(Action::EditReview(ReviewDraft {
                text: "Solid".to_string(),
                order_rating: 4,
                restaurant_rating: 5,
            }))
            .unwrap();
        state.dispatch(Action::SubmitReview).unwrap();
        state.dispatch(Action::ReviewRejected(None)).unwrap();

        let form = state.review_form().unwrap();
        assert_eq!(form.draft().text, "Solid");
        assert!(form.error_message().is_some());
    }

    #[test]
    fn test_review_actions_without_form_are_ignored() {
        let mut state = ViewState::default();
        state.dispatch(Action::SubmitReview).unwrap();
        state.dispatch(Action::ReviewSucceeded).unwrap();
        assert_eq!(state, ViewState::default());
    }

    #[test]
    fn test_session_slice_survives_serialization() {
        let mut state = ViewState::default();
        state.dispatch(Action::SetDeliveryMethod(DeliveryMethod::Pickup)).unwrap();
        state.dispatch(Action::LoadRestaurant(taco_casa())).unwrap();
        state.dispatch(Action::Notify("hello".into())).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let mut restored: ViewState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.delivery_method, DeliveryMethod::Pickup);
        assert_eq!(restored.take_notice().as_deref(), Some("hello"));
        assert_eq!(restored.take_notice(), None);
        // Fetched data is not persisted.
        assert_eq!(restored.restaurants.current, None);
    }
}
