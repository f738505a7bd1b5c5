//! Review list items and the review form modal.

use nom_now_core::{Rating, Review, ReviewForm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItemView {
    pub id: i32,
    pub text: String,
    pub order_stars: String,
    pub restaurant_stars: String,
    pub delete_url: String,
    pub update_url: String,
    /// Where the delete form returns to.
    pub restaurant_href: String,
}

impl From<&Review> for ReviewItemView {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.as_i32(),
            text: review.review.clone(),
            order_stars: review.order_rating.stars(),
            restaurant_stars: review.restaurant_rating.stars(),
            delete_url: format!("/reviews/{}/delete", review.id),
            update_url: format!("/reviews/{}/update", review.id),
            restaurant_href: format!("/restaurants/{}", review.restaurant_id),
        }
    }
}

/// One clickable star of a rating picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarView {
    pub value: u8,
    pub selected: bool,
}

fn star_picker(rating: u8) -> Vec<StarView> {
    (Rating::MIN..=Rating::MAX)
        .map(|value| StarView {
            value,
            selected: value <= rating,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFormView {
    pub action: String,
    pub order_id: Option<i32>,
    pub text: String,
    pub order_rating: u8,
    pub restaurant_rating: u8,
    pub order_stars: Vec<StarView>,
    pub restaurant_stars: Vec<StarView>,
    /// Text and both ratings are filled in and nothing is in flight.
    pub can_submit: bool,
    pub success_message: Option<&'static str>,
    pub error_message: Option<String>,
}

impl From<&ReviewForm> for ReviewFormView {
    fn from(form: &ReviewForm) -> Self {
        let draft = form.draft();
        Self {
            action: format!("/restaurants/{}/reviews", form.restaurant_id()),
            order_id: form.order_id().map(|id| id.as_i32()),
            text: draft.text.clone(),
            order_rating: draft.order_rating,
            restaurant_rating: draft.restaurant_rating,
            order_stars: star_picker(draft.order_rating),
            restaurant_stars: star_picker(draft.restaurant_rating),
            can_submit: form.can_submit(),
            success_message: form.success_message(),
            error_message: form.error_message().map(str::to_string),
        }
    }
}
