//! Core types for Nom Now.
//!
//! Type-safe wrappers for IDs and prices, plus the records the backend
//! serves: users, restaurants, menu items, and reviews.

pub mod delivery;
pub mod email;
pub mod id;
pub mod menu_item;
pub mod price;
pub mod restaurant;
pub mod review;
pub mod user;

pub use delivery::{DeliveryMethod, UnknownDeliveryMethod};
pub use email::{Email, EmailError};
pub use id::*;
pub use menu_item::{MenuItem, MenuItemUpdate, menu_for_restaurant};
pub use price::Price;
pub use restaurant::Restaurant;
pub use review::{NewReview, Rating, RatingError, Review};
pub use user::User;
