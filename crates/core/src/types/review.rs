//! Reviews and star ratings.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{OrderId, RestaurantId, ReviewId, UserId};

/// Errors that can occur when building a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rating must be between 1 and 5 (got {0})")]
pub struct RatingError(pub u8);

/// A star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Create a rating.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError`] if `stars` is outside `1..=5`.
    pub const fn new(stars: u8) -> Result<Self, RatingError> {
        if stars >= Self::MIN && stars <= Self::MAX {
            Ok(Self(stars))
        } else {
            Err(RatingError(stars))
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Filled then hollow stars, e.g. `"★★★☆☆"` for 3.
    #[must_use]
    pub fn stars(self) -> String {
        let filled = usize::from(self.0);
        let hollow = usize::from(Self::MAX) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(hollow))
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored review from `GET /api/reviews/restaurant/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub restaurant_id: RestaurantId,
    pub order_id: OrderId,
    pub review: String,
    pub order_rating: Rating,
    pub restaurant_rating: Rating,
}

/// Body of `POST /api/reviews`.
///
/// Only constructed by [`crate::ReviewDraft::validate`], so every value that
/// reaches the backend has non-blank text and two valid ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub restaurant_id: RestaurantId,
    pub order_id: OrderId,
    pub review: String,
    pub order_rating: Rating,
    pub restaurant_rating: Rating,
}
