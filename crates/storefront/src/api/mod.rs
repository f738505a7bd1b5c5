//! Nom Now backend API.
//!
//! # Architecture
//!
//! - The backend is the source of truth; the storefront keeps no database
//! - [`NomNowApi`] is the seam thunks are written against; [`NomNowClient`]
//!   implements it over HTTP with `reqwest`
//! - Restaurants and menu items are cached in memory via `moka`; reviews never
//!   are, so a refetch after a write always shows the new list
//!
//! # Endpoints
//!
//! ```text
//! GET    /api/restaurants                  -> { "restaurants": [...] }
//! GET    /api/restaurants/:id              -> { "restaurant": {...} }
//! GET    /api/menu-items                   -> { "menuItems": [...] }
//! GET    /api/menu-items/:id               -> {...}
//! PUT    /api/menu-items/:id/update        -> {...} | 400 { "errors": {...} }
//! DELETE /api/menu-items/:id/delete        -> { "message", "id" }
//! GET    /api/reviews/restaurant/:id       -> { "reviews": [...] }
//! POST   /api/reviews                      -> {...} | 400 { "errors": ... }
//! DELETE /api/reviews/:id                  -> { "message" }
//! POST   /api/auth/login                   -> user | 401 { "errors": ... }
//! POST   /api/auth/signup                  -> user | 400 { "errors": ... }
//! GET    /api/auth/logout                  -> { "message" }
//! ```

mod cache;
mod client;

use std::future::Future;

use nom_now_core::{
    Email, MenuItem, MenuItemId, MenuItemUpdate, NewReview, Restaurant, RestaurantId, Review,
    ReviewId, User,
};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

pub use client::NomNowClient;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an `errors` payload.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An endpoint path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// The backend's own explanation, when it gave one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Login form payload.
#[derive(Debug)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

/// Signup form payload.
#[derive(Debug)]
pub struct Signup {
    pub username: String,
    pub email: Email,
    pub password: SecretString,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Operations the storefront needs from the backend.
pub trait NomNowApi: Send + Sync {
    fn get_restaurants(&self) -> impl Future<Output = Result<Vec<Restaurant>, ApiError>> + Send;

    fn get_restaurant(
        &self,
        id: RestaurantId,
    ) -> impl Future<Output = Result<Restaurant, ApiError>> + Send;

    /// The full menu-item collection across all restaurants.
    fn get_menu_items(&self) -> impl Future<Output = Result<Vec<MenuItem>, ApiError>> + Send;

    fn get_menu_item(&self, id: MenuItemId)
    -> impl Future<Output = Result<MenuItem, ApiError>> + Send;

    fn update_menu_item(
        &self,
        id: MenuItemId,
        update: &MenuItemUpdate,
    ) -> impl Future<Output = Result<MenuItem, ApiError>> + Send;

    fn delete_menu_item(&self, id: MenuItemId) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn get_reviews_for_restaurant(
        &self,
        id: RestaurantId,
    ) -> impl Future<Output = Result<Vec<Review>, ApiError>> + Send;

    fn create_review(&self, review: &NewReview)
    -> impl Future<Output = Result<Review, ApiError>> + Send;

    fn delete_review(&self, id: ReviewId) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn login(&self, credentials: &Credentials)
    -> impl Future<Output = Result<User, ApiError>> + Send;

    fn signup(&self, signup: &Signup) -> impl Future<Output = Result<User, ApiError>> + Send;

    fn logout(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

// =============================================================================
// Response Envelopes
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct RestaurantsEnvelope {
    pub restaurants: Vec<Restaurant>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestaurantEnvelope {
    pub restaurant: Restaurant,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MenuItemsEnvelope {
    #[serde(rename = "menuItems", alias = "menu_items")]
    pub menu_items: Vec<MenuItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewsEnvelope {
    #[serde(rename = "reviews", alias = "Reviews")]
    pub reviews: Vec<Review>,
}

/// Flatten an `errors` payload into one line of text.
///
/// Flask-WTF sends `{ "field": ["msg", ...] }`; hand-written routes send a
/// string or a list of strings.
pub(crate) fn describe_errors(errors: &serde_json::Value) -> String {
    use serde_json::Value;

    match errors {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(describe_errors)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(fields) => fields
            .iter()
            .map(|(field, value)| format!("{field}: {}", describe_errors(value)))
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
