//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                - Restaurant list
//! GET  /health                          - Health check
//!
//! # Restaurants & menu
//! GET  /restaurants/:id                 - Restaurant detail with menu and reviews
//! GET  /menu-items/:id                  - Menu item detail
//!
//! # Reviews
//! GET  /restaurants/:id/reviews         - Review list fragment
//! GET  /restaurants/:id/reviews/new     - Open the review form modal (?order_id=)
//! POST /restaurants/:id/reviews         - Submit the open review form
//! POST /reviews/:id/delete              - Delete a review
//! POST /reviews/:id/update              - Not supported (501)
//! POST /modal/close                     - Close the modal
//!
//! # Cart
//! GET  /cart                            - Cart page
//! POST /cart/add                        - Add one unit of a dish
//! POST /cart/remove                     - Remove a dish
//! POST /cart/clear                      - Empty the cart
//! POST /delivery-method                 - Switch delivery/pickup
//!
//! # Auth
//! GET  /login, POST /login              - Log in
//! GET  /signup, POST /signup            - Sign up
//! POST /logout                          - Log out
//! ```
//!
//! Every POST answers with a redirect (post/redirect/get); outcomes the
//! visitor should see travel through the store as a notice or form status.

pub mod auth;
pub mod cart;
pub mod delivery;
pub mod home;
pub mod menu_items;
pub mod restaurants;
pub mod reviews;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the restaurant routes router.
pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(restaurants::show))
        .route(
            "/{id}/reviews",
            get(reviews::list).post(reviews::create),
        )
        .route("/{id}/reviews/new", get(reviews::new))
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/delete", post(reviews::delete))
        .route("/{id}/update", post(reviews::update))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .nest("/restaurants", restaurant_routes())
        .route("/menu-items/{id}", get(menu_items::show))
        .nest("/reviews", review_routes())
        .route("/modal/close", post(reviews::close_modal))
        .nest("/cart", cart_routes())
        .route("/delivery-method", post(delivery::set))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// A same-site path to send the visitor back to, or `fallback`.
///
/// Anything that is not an absolute path on this host is ignored, so a
/// posted `return_to` cannot redirect off-site.
pub(crate) fn local_path(candidate: Option<&str>, fallback: &str) -> String {
    candidate
        .map(str::trim)
        .filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_accepts_site_paths() {
        assert_eq!(local_path(Some("/restaurants/3"), "/"), "/restaurants/3");
        assert_eq!(local_path(None, "/cart"), "/cart");
    }

    #[test]
    fn test_local_path_rejects_offsite_targets() {
        assert_eq!(local_path(Some("https://evil.test/"), "/"), "/");
        assert_eq!(local_path(Some("//evil.test"), "/"), "/");
        assert_eq!(local_path(Some("/\\evil.test"), "/"), "/");
        assert_eq!(local_path(Some(""), "/"), "/");
    }
}
