//! Review route handlers.
//!
//! The review form lives in the store's modal slot, so it survives the
//! redirect after a failed submit with its fields and error intact.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use nom_now_core::{OrderId, Rating, RestaurantId, ReviewDraft, ReviewId};
use serde::Deserialize;
use tracing::{info, instrument};

use super::local_path;
use crate::error::{AppError, Result};
use crate::middleware::ViewStore;
use crate::state::AppState;
use crate::thunks::{self, SubmitReviewError};
use crate::views::ReviewItemView;

/// Shown for the review "Update" button.
pub const UPDATE_NOT_SUPPORTED: &str = "Updating reviews is not supported yet";

/// Review list fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/review_list.html")]
pub struct ReviewListTemplate {
    pub reviews: Vec<ReviewItemView>,
}

#[derive(Debug, Deserialize)]
pub struct NewReviewQuery {
    pub order_id: Option<String>,
}

/// Posted review form. Unselected ratings arrive as missing fields.
#[derive(Debug, Deserialize)]
pub struct ReviewFormData {
    #[serde(default)]
    pub review: String,
    pub order_rating: Option<String>,
    pub restaurant_rating: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnToForm {
    pub return_to: Option<String>,
}

/// A blank or malformed order number counts as missing.
fn parse_order_id(raw: Option<&str>) -> Option<OrderId> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// A missing, blank, malformed or out-of-range rating counts as unselected.
fn parse_rating(raw: Option<&str>) -> u8 {
    raw.and_then(|s| s.trim().parse::<u8>().ok())
        .filter(|stars| (Rating::MIN..=Rating::MAX).contains(stars))
        .unwrap_or(0)
}

/// Render the review list for a restaurant.
#[instrument(skip(state, store), fields(restaurant_id = %id))]
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
    mut store: ViewStore,
) -> Result<impl IntoResponse> {
    thunks::get_reviews_for_restaurant(state.api(), store.state_mut(), id).await?;

    Ok(ReviewListTemplate {
        reviews: store
            .state()
            .reviews_for(id)
            .iter()
            .map(ReviewItemView::from)
            .collect(),
    })
}

/// Open an empty review form in the modal.
#[instrument(skip(store), fields(restaurant_id = %id))]
pub async fn new(
    Path(id): Path<RestaurantId>,
    Query(query): Query<NewReviewQuery>,
    mut store: ViewStore,
) -> Result<Redirect> {
    let order_id = parse_order_id(query.order_id.as_deref());
    thunks::open_review_form(store.state_mut(), id, order_id);
    store.save().await?;

    Ok(Redirect::to(&format!("/restaurants/{id}")))
}

/// Submit the open review form.
///
/// Either way the visitor lands back on the restaurant page: on success with
/// the modal closed, the list refreshed, and a notice; on failure with the
/// modal still open showing the error.
#[instrument(skip(state, store, form), fields(restaurant_id = %id))]
pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
    mut store: ViewStore,
    Form(form): Form<ReviewFormData>,
) -> Result<Redirect> {
    if store.state().review_form().map(|f| f.restaurant_id()) != Some(id) {
        return Err(AppError::BadRequest(
            "No review form is open for this restaurant".to_string(),
        ));
    }

    let draft = ReviewDraft {
        text: form.review,
        order_rating: parse_rating(form.order_rating.as_deref()),
        restaurant_rating: parse_rating(form.restaurant_rating.as_deref()),
    };

    match thunks::create_review(state.api(), store.state_mut(), draft).await {
        Ok(review) => info!(review_id = %review.id, "Review created"),
        Err(SubmitReviewError::NoOpenForm) => {
            return Err(AppError::BadRequest("No review form is open".to_string()));
        }
        Err(e) => info!(reason = %e, "Review not created"),
    }
    store.save().await?;

    Ok(Redirect::to(&format!("/restaurants/{id}")))
}

/// Delete a review. No confirmation is asked.
#[instrument(skip(state, store), fields(review_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
    mut store: ViewStore,
    Form(form): Form<ReturnToForm>,
) -> Result<Redirect> {
    thunks::delete_review(state.api(), store.state_mut(), id).await?;
    store.save().await?;

    Ok(Redirect::to(&local_path(form.return_to.as_deref(), "/")))
}

/// Review editing does not exist yet.
#[instrument(fields(review_id = %id))]
pub async fn update(Path(id): Path<ReviewId>) -> Result<Redirect> {
    Err(AppError::NotImplemented(UPDATE_NOT_SUPPORTED.to_string()))
}

/// Close whatever the modal shows.
#[instrument(skip(store))]
pub async fn close_modal(mut store: ViewStore, Form(form): Form<ReturnToForm>) -> Result<Redirect> {
    thunks::close_modal(store.state_mut());
    store.save().await?;

    Ok(Redirect::to(&local_path(form.return_to.as_deref(), "/")))
}
