//! Review form validation and submission states.
//!
//! ```text
//!            begin_submit (valid)          succeed
//! Editing ───────────────────────▶ Submitting ───────▶ Success
//!    ▲  │                              │
//!    │  │ begin_submit (invalid)       │ fail / fail_unexpected
//!    │  ▼                              ▼
//!    └─ Error ◀────────────────────────┘
//! ```
//!
//! Editing any field from `Error` or `Success` returns the form to `Editing`.

use serde::{Deserialize, Serialize};

use crate::types::{NewReview, OrderId, Rating, RestaurantId};

/// Shown after the backend accepts a review.
pub const SUCCESS_MESSAGE: &str = "Review submitted successfully!";

/// Shown when the backend rejects a review without saying why.
pub const REJECTED_MESSAGE: &str = "Failed to submit review. Please try again.";

/// Shown when the request itself fails.
pub const UNEXPECTED_MESSAGE: &str = "An error occurred. Please try again.";

/// A precondition that blocks submission. Checked in declaration order.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFormError {
    #[error("Order ID is missing. Please try again.")]
    MissingOrderId,
    #[error("Please write a review before submitting.")]
    EmptyText,
    #[error("Please select a rating for both order and restaurant.")]
    MissingRating,
}

/// Raw field values. A rating of 0 means no star is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub text: String,
    pub order_rating: u8,
    pub restaurant_rating: u8,
}

impl ReviewDraft {
    /// Check the draft and build the request body.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ReviewFormError`]: missing order id, then
    /// blank text, then either rating unselected or out of range.
    pub fn validate(
        &self,
        restaurant_id: RestaurantId,
        order_id: Option<OrderId>,
    ) -> Result<NewReview, ReviewFormError> {
        let order_id = order_id.ok_or(ReviewFormError::MissingOrderId)?;
        if self.text.trim().is_empty() {
            return Err(ReviewFormError::EmptyText);
        }
        let (Ok(order_rating), Ok(restaurant_rating)) = (
            Rating::new(self.order_rating),
            Rating::new(self.restaurant_rating),
        ) else {
            return Err(ReviewFormError::MissingRating);
        };

        Ok(NewReview {
            restaurant_id,
            order_id,
            review: self.text.clone(),
            order_rating,
            restaurant_rating,
        })
    }
}

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewFormStatus {
    #[default]
    Editing,
    Submitting,
    Success,
    Error(String),
}

/// The review form for one restaurant and order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewForm {
    restaurant_id: RestaurantId,
    order_id: Option<OrderId>,
    draft: ReviewDraft,
    status: ReviewFormStatus,
}

impl ReviewForm {
    #[must_use]
    pub fn new(restaurant_id: RestaurantId, order_id: Option<OrderId>) -> Self {
        Self {
            restaurant_id,
            order_id,
            draft: ReviewDraft::default(),
            status: ReviewFormStatus::Editing,
        }
    }

    #[must_use]
    pub const fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    #[must_use]
    pub const fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    #[must_use]
    pub const fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    #[must_use]
    pub const fn status(&self) -> &ReviewFormStatus {
        &self.status
    }

    /// Replace all field values at once, as a posted form does.
    pub fn edit(&mut self, draft: ReviewDraft) {
        self.draft = draft;
        self.status = ReviewFormStatus::Editing;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
        self.status = ReviewFormStatus::Editing;
    }

    pub fn set_order_rating(&mut self, stars: u8) {
        self.draft.order_rating = stars.min(Rating::MAX);
        self.status = ReviewFormStatus::Editing;
    }

    pub fn set_restaurant_rating(&mut self, stars: u8) {
        self.draft.restaurant_rating = stars.min(Rating::MAX);
        self.status = ReviewFormStatus::Editing;
    }

    /// Whether the submit button should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !matches!(self.status, ReviewFormStatus::Submitting)
            && self
                .draft
                .validate(self.restaurant_id, self.order_id)
                .is_ok()
    }

    /// Validate and move to `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns the failing precondition and moves to `Error` with its message.
    pub fn begin_submit(&mut self) -> Result<NewReview, ReviewFormError> {
        match self.draft.validate(self.restaurant_id, self.order_id) {
            Ok(review) => {
                self.status = ReviewFormStatus::Submitting;
                Ok(review)
            }
            Err(err) => {
                self.status = ReviewFormStatus::Error(err.to_string());
                Err(err)
            }
        }
    }

    /// The backend stored the review: clear every field.
    pub fn succeed(&mut self) {
        self.draft = ReviewDraft::default();
        self.status = ReviewFormStatus::Success;
    }

    /// The backend answered with an `errors` payload. Fields are kept.
    pub fn fail(&mut self, server_message: Option<String>) {
        let message = server_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| REJECTED_MESSAGE.to_string());
        self.status = ReviewFormStatus::Error(message);
    }

    /// The request never produced an answer. Fields are kept.
    pub fn fail_unexpected(&mut self) {
        self.status = ReviewFormStatus::Error(UNEXPECTED_MESSAGE.to_string());
    }

    #[must_use]
    pub fn success_message(&self) -> Option<&'static str> {
        matches!(self.status, ReviewFormStatus::Success).then_some(SUCCESS_MESSAGE)
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            ReviewFormStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn form() -> ReviewForm {
        ReviewForm::new(RestaurantId::new(1), Some(OrderId::new(10)))
    }

    fn filled() -> ReviewForm {
        let mut form = form();
        form.set_text("Crispy and hot");
        form.set_order_rating(4);
        form.set_restaurant_rating(5);
        form
    }

    #[test]
    fn test_empty_text_blocks_submit() {
        let mut form = form();
        form.set_text("   ");
        form.set_order_rating(3);
        form.set_restaurant_rating(3);

        assert!(!form.can_submit());
        assert_eq!(form.begin_submit(), Err(ReviewFormError::EmptyText));
        assert_eq!(
            form.error_message(),
            Some("Please write a review before submitting.")
        );
    }

    #[test]
    fn test_missing_order_rating_reports_rating_error_not_text() {
        let mut form = form();
        form.set_text("Good");
        form.set_order_rating(0);
        form.set_restaurant_rating(4);

        assert_eq!(form.begin_submit(), Err(ReviewFormError::MissingRating));
        assert_eq!(
            form.error_message(),
            Some("Please select a rating for both order and restaurant.")
        );
    }

    #[test]
    fn test_missing_order_id_checked_first() {
        let mut form = ReviewForm::new(RestaurantId::new(1), None);
        assert_eq!(form.begin_submit(), Err(ReviewFormError::MissingOrderId));
        assert_eq!(
            form.error_message(),
            Some("Order ID is missing. Please try again.")
        );
    }

    #[test]
    fn test_out_of_range_rating_is_invalid() {
        let draft = ReviewDraft {
            text: "ok".to_string(),
            order_rating: 6,
            restaurant_rating: 3,
        };
        assert_eq!(
            draft.validate(RestaurantId::new(1), Some(OrderId::new(1))),
            Err(ReviewFormError::MissingRating)
        );
    }

    #[test]
    fn test_setters_clamp_to_five_stars() {
        let mut form = form();
        form.set_order_rating(9);
        assert_eq!(form.draft().order_rating, 5);
    }

    #[test]
    fn test_valid_submit_then_success_resets_fields() {
        let mut form = filled();
        assert!(form.can_submit());

        let review = form.begin_submit().unwrap();
        assert_eq!(review.order_id, OrderId::new(10));
        assert_eq!(review.order_rating.value(), 4);
        assert_eq!(form.status(), &ReviewFormStatus::Submitting);
        assert!(!form.can_submit());

        form.succeed();
        assert_eq!(form.draft(), &ReviewDraft::default());
        assert_eq!(form.success_message(), Some(SUCCESS_MESSAGE));
        assert_eq!(form.error_message(), None);
    }

    #[test]
    fn test_failure_keeps_fields() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.fail(Some("You already reviewed this order".to_string()));

        assert_eq!(form.draft().text, "Crispy and hot");
        assert_eq!(form.error_message(), Some("You already reviewed this order"));
    }

    #[test]
    fn test_failure_without_message_uses_generic_text() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.fail(None);
        assert_eq!(form.error_message(), Some(REJECTED_MESSAGE));

        form.fail_unexpected();
        assert_eq!(form.error_message(), Some(UNEXPECTED_MESSAGE));
    }

    #[test]
    fn test_editing_after_error_clears_message() {
        let mut form = form();
        let _ = form.begin_submit();
        form.set_text("Now with words");
        assert_eq!(form.status(), &ReviewFormStatus::Editing);
    }
}
