//! Backend round-trips that feed the view-state store.
//!
//! Each thunk calls [`NomNowApi`], then records the outcome by dispatching
//! [`Action`]s. None of them touch [`ViewState`] fields directly.

use nom_now_core::review_form::SUCCESS_MESSAGE;
use nom_now_core::{
    Action, CartError, CartItem, DeliveryMethod, MenuItem, MenuItemId, Modal, OrderId,
    RestaurantId, Review, ReviewDraft, ReviewForm, ReviewFormError, ReviewId, User, ViewState,
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::api::{ApiError, Credentials, NomNowApi, Signup};

/// Shown when a visitor without a session presses "Add to Cart".
pub const LOGIN_REQUIRED_MESSAGE: &str = "You must be logged in to add items to the cart!";

/// Why an add-to-cart did not happen.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AddToCartError {
    #[error("You must be logged in to add items to the cart!")]
    NotLoggedIn,
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Why a review was not stored.
#[derive(Debug, Error)]
pub enum SubmitReviewError {
    #[error("No review form is open")]
    NoOpenForm,
    #[error(transparent)]
    Invalid(#[from] ReviewFormError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Dispatch an action that cannot be refused.
///
/// Only `AddToCart` can fail, and it goes through [`add_to_cart`].
fn commit(store: &mut ViewState, action: Action) {
    let name = action.name();
    if let Err(e) = store.dispatch(action) {
        warn!(action = name, error = %e, "Action refused by store");
    } else {
        debug!(action = name, "Action applied");
    }
}

// =============================================================================
// Restaurants & menu
// =============================================================================

/// Load the restaurant list.
///
/// # Errors
///
/// Returns the backend error; the store keeps its previous list.
#[instrument(skip(api, store))]
pub async fn get_restaurants(api: &impl NomNowApi, store: &mut ViewState) -> Result<(), ApiError> {
    let restaurants = api.get_restaurants().await?;
    commit(store, Action::LoadRestaurants(restaurants));
    Ok(())
}

/// Load one restaurant. A failure is recorded in the store, not returned,
/// so the detail page can render its error state.
#[instrument(skip(api, store), fields(restaurant_id = %id))]
pub async fn get_restaurant(api: &impl NomNowApi, store: &mut ViewState, id: RestaurantId) {
    match api.get_restaurant(id).await {
        Ok(restaurant) => commit(store, Action::LoadRestaurant(restaurant)),
        Err(e) => {
            warn!(error = %e, "Failed to load restaurant");
            let message = match &e {
                ApiError::NotFound(message) | ApiError::Rejected { message, .. } => message.clone(),
                _ => "Unable to load this restaurant right now.".to_string(),
            };
            commit(store, Action::RestaurantFailed(message));
        }
    }
}

/// Load the full menu-item collection.
///
/// # Errors
///
/// Returns the backend error; the store keeps its previous collection.
#[instrument(skip(api, store))]
pub async fn get_menu_items(api: &impl NomNowApi, store: &mut ViewState) -> Result<(), ApiError> {
    let items = api.get_menu_items().await?;
    commit(store, Action::LoadMenuItems(items));
    Ok(())
}

/// Fetch one menu item. Single items are not kept in the store.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
#[instrument(skip(api), fields(menu_item_id = %id))]
pub async fn get_menu_item(api: &impl NomNowApi, id: MenuItemId) -> Result<MenuItem, ApiError> {
    api.get_menu_item(id).await
}

// =============================================================================
// Cart & delivery
// =============================================================================

/// Put one unit of `item` from `restaurant_id` in the cart.
///
/// # Errors
///
/// Returns [`AddToCartError::NotLoggedIn`] without dispatching anything when
/// no user is signed in, or the store's [`CartError`] when the cart holds
/// another restaurant's dishes.
pub fn add_to_cart(
    store: &mut ViewState,
    item: &MenuItem,
    restaurant_id: RestaurantId,
) -> Result<(), AddToCartError> {
    if store.session_user.is_none() {
        return Err(AddToCartError::NotLoggedIn);
    }

    store.dispatch(Action::AddToCart(CartItem::single(item, restaurant_id)))?;
    debug!(menu_item_id = %item.id, restaurant_id = %restaurant_id, "Added to cart");
    Ok(())
}

pub fn set_delivery_method(store: &mut ViewState, method: DeliveryMethod) {
    commit(store, Action::SetDeliveryMethod(method));
}

pub fn remove_from_cart(store: &mut ViewState, id: MenuItemId) {
    commit(store, Action::RemoveFromCart(id));
}

pub fn clear_cart(store: &mut ViewState) {
    commit(store, Action::ClearCart);
}

/// Queue a message for the next rendered page.
pub fn notify(store: &mut ViewState, message: impl Into<String>) {
    commit(store, Action::Notify(message.into()));
}

// =============================================================================
// Reviews
// =============================================================================

/// Load the review list for a restaurant.
///
/// # Errors
///
/// Returns the backend error; previously loaded reviews are kept.
#[instrument(skip(api, store), fields(restaurant_id = %restaurant_id))]
pub async fn get_reviews_for_restaurant(
    api: &impl NomNowApi,
    store: &mut ViewState,
    restaurant_id: RestaurantId,
) -> Result<(), ApiError> {
    let reviews = api.get_reviews_for_restaurant(restaurant_id).await?;
    commit(
        store,
        Action::LoadReviews {
            restaurant_id,
            reviews,
        },
    );
    Ok(())
}

/// Show an empty review form in the modal.
pub fn open_review_form(
    store: &mut ViewState,
    restaurant_id: RestaurantId,
    order_id: Option<OrderId>,
) {
    commit(
        store,
        Action::SetModalContent(Modal::ReviewForm(ReviewForm::new(restaurant_id, order_id))),
    );
}

pub fn close_modal(store: &mut ViewState) {
    commit(store, Action::CloseModal);
}

/// Submit the open review form with `draft` as its field values.
///
/// On success the form is reset, the restaurant's reviews are refetched,
/// the modal closes and the success message becomes the pending notice.
/// On failure the form stays open with its fields and an error message.
///
/// # Errors
///
/// Returns why the review was not stored. The form's status already
/// reflects it.
#[instrument(skip(api, store, draft))]
pub async fn create_review(
    api: &impl NomNowApi,
    store: &mut ViewState,
    draft: ReviewDraft,
) -> Result<Review, SubmitReviewError> {
    commit(store, Action::EditReview(draft));

    let form = store.review_form().ok_or(SubmitReviewError::NoOpenForm)?;
    let restaurant_id = form.restaurant_id();
    let validated = form.draft().validate(restaurant_id, form.order_id());
    commit(store, Action::SubmitReview);
    let new_review = validated?;

    match api.create_review(&new_review).await {
        Ok(review) => {
            commit(store, Action::ReviewSucceeded);
            if let Err(e) = get_reviews_for_restaurant(api, store, restaurant_id).await {
                warn!(error = %e, "Failed to refresh reviews after submit");
            }
            commit(store, Action::CloseModal);
            commit(store, Action::Notify(SUCCESS_MESSAGE.to_string()));
            Ok(review)
        }
        Err(e) => {
            warn!(error = %e, "Review submission failed");
            match e.server_message() {
                Some(message) => {
                    commit(store, Action::ReviewRejected(Some(message.to_string())));
                }
                None => commit(store, Action::ReviewFailed),
            }
            Err(e.into())
        }
    }
}

/// Delete a review and drop it from every loaded list.
///
/// # Errors
///
/// Returns the backend error; the lists are left as they were.
#[instrument(skip(api, store), fields(review_id = %id))]
pub async fn delete_review(
    api: &impl NomNowApi,
    store: &mut ViewState,
    id: ReviewId,
) -> Result<(), ApiError> {
    api.delete_review(id).await?;
    commit(store, Action::RemoveReview(id));
    Ok(())
}

// =============================================================================
// Session
// =============================================================================

/// Sign in and remember the user.
///
/// # Errors
///
/// Returns [`ApiError::Rejected`] for bad credentials.
#[instrument(skip(api, store, credentials))]
pub async fn login(
    api: &impl NomNowApi,
    store: &mut ViewState,
    credentials: &Credentials,
) -> Result<User, ApiError> {
    let user = api.login(credentials).await?;
    commit(store, Action::SetUser(user.clone()));
    Ok(user)
}

/// Create an account and sign in as it.
///
/// # Errors
///
/// Returns [`ApiError::Rejected`] with the backend's field errors.
#[instrument(skip(api, store, signup))]
pub async fn signup(
    api: &impl NomNowApi,
    store: &mut ViewState,
    signup: &Signup,
) -> Result<User, ApiError> {
    let user = api.signup(signup).await?;
    commit(store, Action::SetUser(user.clone()));
    Ok(user)
}

/// Sign out. The local session is cleared even if the backend call fails.
#[instrument(skip(api, store))]
pub async fn logout(api: &impl NomNowApi, store: &mut ViewState) {
    if let Err(e) = api.logout().await {
        warn!(error = %e, "Backend logout failed");
    }
    commit(store, Action::RemoveUser);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use nom_now_core::{
        Email, MenuItemUpdate, NewReview, Price, Rating, Restaurant, ReviewFormStatus,
    };
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    use super::*;

    /// In-memory backend that records every call.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub calls: Mutex<Vec<String>>,
        pub restaurants: Vec<Restaurant>,
        pub menu_items: Vec<MenuItem>,
        pub reviews: Mutex<Vec<Review>>,
        /// When set, `create_review` answers with this rejection.
        pub reject_review: Option<String>,
        /// When set, `create_review` fails as if the connection dropped.
        pub break_review: bool,
    }

    impl FakeApi {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl NomNowApi for FakeApi {
        async fn get_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
            self.record("get_restaurants");
            Ok(self.restaurants.clone())
        }

        async fn get_restaurant(&self, id: RestaurantId) -> Result<Restaurant, ApiError> {
            self.record(format!("get_restaurant {id}"));
            self.restaurants
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound("Restaurant couldn't be found".into()))
        }

        async fn get_menu_items(&self) -> Result<Vec<MenuItem>, ApiError> {
            self.record("get_menu_items");
            Ok(self.menu_items.clone())
        }

        async fn get_menu_item(&self, id: MenuItemId) -> Result<MenuItem, ApiError> {
            self.record(format!("get_menu_item {id}"));
            self.menu_items
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound("Menu item couldn't be found".into()))
        }

        async fn update_menu_item(
            &self,
            id: MenuItemId,
            _update: &MenuItemUpdate,
        ) -> Result<MenuItem, ApiError> {
            self.get_menu_item(id).await
        }

        async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), ApiError> {
            self.record(format!("delete_menu_item {id}"));
            Ok(())
        }

        async fn get_reviews_for_restaurant(
            &self,
            id: RestaurantId,
        ) -> Result<Vec<Review>, ApiError> {
            self.record(format!("get_reviews {id}"));
            Ok(self
                .reviews
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.restaurant_id == id)
                .cloned()
                .collect())
        }

        async fn create_review(&self, review: &NewReview) -> Result<Review, ApiError> {
            self.record(format!("create_review {}", review.restaurant_id));
            if let Some(message) = &self.reject_review {
                return Err(ApiError::Rejected {
                    status: 400,
                    message: message.clone(),
                });
            }
            if self.break_review {
                return Err(ApiError::Status {
                    status: 500,
                    body: String::new(),
                });
            }
            let mut reviews = self.reviews.lock().unwrap();
            let stored = Review {
                id: ReviewId::new(i32::try_from(reviews.len()).unwrap() + 1),
                user_id: None,
                restaurant_id: review.restaurant_id,
                order_id: review.order_id,
                review: review.review.clone(),
                order_rating: review.order_rating,
                restaurant_rating: review.restaurant_rating,
            };
            reviews.push(stored.clone());
            Ok(stored)
        }

        async fn delete_review(&self, id: ReviewId) -> Result<(), ApiError> {
            self.record(format!("delete_review {id}"));
            self.reviews.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }

        async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
            self.record(format!("login {}", credentials.email));
            Ok(user())
        }

        async fn signup(&self, signup: &Signup) -> Result<User, ApiError> {
            self.record(format!("signup {}", signup.username));
            Ok(user())
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.record("logout");
            Err(ApiError::Status {
                status: 503,
                body: String::new(),
            })
        }
    }

    pub(crate) fn user() -> User {
        User {
            id: nom_now_core::UserId::new(1),
            username: "demo".to_string(),
            email: Email::parse("demo@aa.io").unwrap(),
            first_name: Some("Demo".to_string()),
            last_name: Some("User".to_string()),
            address: Some("1 Main St".to_string()),
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
            zip: Some("78701".to_string()),
        }
    }

    pub(crate) fn restaurant(id: i32, name: &str) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(id),
            name: name.to_string(),
            address: "12 Elm St".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zip: "78701".to_string(),
            cuisine_type: Some("Mexican".to_string()),
            price_level: Some("$$".to_string()),
            delivery_time: Some(25),
            delivery_fee: Some(Price::from_cents(299)),
            business_hours: None,
            store_image: None,
        }
    }

    pub(crate) fn dish(id: i32, restaurant: i32, name: &str, cents: i64) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            restaurant_id: RestaurantId::new(restaurant),
            name: name.to_string(),
            food_type: Some("Entree".to_string()),
            description: None,
            price: Price::from_cents(cents),
            food_image: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn draft(text: &str, order: u8, restaurant: u8) -> ReviewDraft {
        ReviewDraft {
            text: text.to_string(),
            order_rating: order,
            restaurant_rating: restaurant,
        }
    }

    fn signed_in() -> ViewState {
        let mut store = ViewState::default();
        store.dispatch(Action::SetUser(user())).unwrap();
        store
    }

    #[test]
    fn test_add_to_cart_requires_login() {
        let mut store = ViewState::default();
        let err = add_to_cart(&mut store, &dish(1, 1, "Taco", 399), RestaurantId::new(1))
            .unwrap_err();

        assert_eq!(err, AddToCartError::NotLoggedIn);
        assert_eq!(err.to_string(), LOGIN_REQUIRED_MESSAGE);
        assert!(store.cart.is_empty());
    }

    #[test]
    fn test_add_to_cart_rejects_other_restaurant() {
        let mut store = signed_in();
        add_to_cart(&mut store, &dish(1, 1, "Taco", 399), RestaurantId::new(1)).unwrap();
        let err = add_to_cart(&mut store, &dish(2, 2, "Pho", 1299), RestaurantId::new(2))
            .unwrap_err();

        assert!(matches!(err, AddToCartError::Cart(CartError::OtherRestaurant { .. })));
        assert_eq!(store.cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_get_restaurant_failure_is_stored() {
        let api = FakeApi::default();
        let mut store = ViewState::default();

        get_restaurant(&api, &mut store, RestaurantId::new(9)).await;

        assert!(store.restaurants.current.is_none());
        assert_eq!(
            store.restaurants.error.as_deref(),
            Some("Restaurant couldn't be found")
        );
    }

    #[tokio::test]
    async fn test_create_review_empty_text_never_calls_backend() {
        let api = FakeApi::default();
        let mut store = signed_in();
        open_review_form(&mut store, RestaurantId::new(1), Some(OrderId::new(4)));

        let err = create_review(&api, &mut store, draft("   ", 5, 5))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SubmitReviewError::Invalid(ReviewFormError::EmptyText)
        ));
        assert!(api.calls().is_empty());
        assert_eq!(
            store.review_form().unwrap().error_message(),
            Some("Please write a review before submitting.")
        );
    }

    #[tokio::test]
    async fn test_create_review_zero_rating_reports_ratings() {
        let api = FakeApi::default();
        let mut store = signed_in();
        open_review_form(&mut store, RestaurantId::new(1), Some(OrderId::new(4)));

        let err = create_review(&api, &mut store, draft("Great", 0, 4))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SubmitReviewError::Invalid(ReviewFormError::MissingRating)
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_review_success_refreshes_and_closes() {
        let api = FakeApi::default();
        let mut store = signed_in();
        open_review_form(&mut store, RestaurantId::new(1), Some(OrderId::new(4)));

        let review = create_review(&api, &mut store, draft("Great tacos", 5, 4))
            .await
            .unwrap();

        assert_eq!(review.order_rating, Rating::new(5).unwrap());
        assert_eq!(
            api.calls(),
            vec!["create_review 1".to_string(), "get_reviews 1".to_string()]
        );
        assert_eq!(store.reviews_for(RestaurantId::new(1)).len(), 1);
        assert!(store.modal.is_none());
        assert_eq!(store.take_notice().as_deref(), Some(SUCCESS_MESSAGE));
    }

    #[tokio::test]
    async fn test_create_review_rejection_keeps_fields() {
        let api = FakeApi {
            reject_review: Some("review: Too short".to_string()),
            ..FakeApi::default()
        };
        let mut store = signed_in();
        open_review_form(&mut store, RestaurantId::new(1), Some(OrderId::new(4)));

        let result = create_review(&api, &mut store, draft("Ok", 3, 3)).await;

        assert!(matches!(result, Err(SubmitReviewError::Api(_))));
        let form = store.review_form().unwrap();
        assert_eq!(form.draft().text, "Ok");
        assert_eq!(
            form.status(),
            &ReviewFormStatus::Error("review: Too short".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_review_transport_failure_is_generic() {
        let api = FakeApi {
            break_review: true,
            ..FakeApi::default()
        };
        let mut store = signed_in();
        open_review_form(&mut store, RestaurantId::new(1), Some(OrderId::new(4)));

        let _ = create_review(&api, &mut store, draft("Ok", 3, 3)).await;

        assert_eq!(
            store.review_form().unwrap().error_message(),
            Some("An error occurred. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_create_review_without_open_form() {
        let api = FakeApi::default();
        let mut store = signed_in();

        let result = create_review(&api, &mut store, draft("Ok", 3, 3)).await;

        assert!(matches!(result, Err(SubmitReviewError::NoOpenForm)));
    }

    #[tokio::test]
    async fn test_delete_review_removes_from_lists() {
        let api = FakeApi::default();
        let mut store = signed_in();
        open_review_form(&mut store, RestaurantId::new(1), Some(OrderId::new(4)));
        let review = create_review(&api, &mut store, draft("Great", 5, 5))
            .await
            .unwrap();

        delete_review(&api, &mut store, review.id).await.unwrap();

        assert!(store.reviews_for(RestaurantId::new(1)).is_empty());
        assert!(api.calls().contains(&format!("delete_review {}", review.id)));
    }

    #[tokio::test]
    async fn test_login_then_logout_clears_session() {
        let api = FakeApi::default();
        let mut store = ViewState::default();
        let credentials = Credentials {
            email: Email::parse("demo@aa.io").unwrap(),
            password: SecretString::from("password"),
        };

        login(&api, &mut store, &credentials).await.unwrap();
        add_to_cart(&mut store, &dish(1, 1, "Taco", 399), RestaurantId::new(1)).unwrap();
        assert_eq!(store.session_user, Some(user()));

        logout(&api, &mut store).await;

        assert!(store.session_user.is_none());
        assert!(store.cart.is_empty());
    }

    #[tokio::test]
    async fn test_menu_loads_dispatch_into_store() {
        let api = FakeApi {
            restaurants: vec![restaurant(1, "Taco Casa")],
            menu_items: vec![dish(1, 1, "Taco", 399), dish(2, 2, "Pho", 1299)],
            ..FakeApi::default()
        };
        let mut store = ViewState::default();

        get_restaurants(&api, &mut store).await.unwrap();
        get_restaurant(&api, &mut store, RestaurantId::new(1)).await;
        get_menu_items(&api, &mut store).await.unwrap();

        assert_eq!(store.restaurants.list.len(), 1);
        assert_eq!(
            store.restaurants.current.as_ref().map(|r| r.name.as_str()),
            Some("Taco Casa")
        );
        assert_eq!(store.menu_items.len(), 2);
        assert!(get_menu_item(&api, MenuItemId::new(7)).await.is_err());
    }
}
