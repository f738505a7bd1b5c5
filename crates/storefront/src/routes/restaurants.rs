//! Restaurant detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, Path, State},
    response::{IntoResponse, Response},
};
use nom_now_core::RestaurantId;
use tracing::{instrument, warn};

use crate::error::Result;
use crate::filters;
use crate::middleware::ViewStore;
use crate::state::AppState;
use crate::thunks;
use crate::views::{PageChrome, RestaurantDetailView, RestaurantPage};

/// Restaurant detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "restaurants/show.html")]
pub struct RestaurantShowTemplate {
    pub chrome: PageChrome,
    pub restaurant: RestaurantPage,
}

/// Error or loading placeholder in place of the detail page.
#[derive(Template, WebTemplate)]
#[template(path = "restaurants/status.html")]
pub struct RestaurantStatusTemplate {
    pub chrome: PageChrome,
    pub message: String,
}

/// Display a restaurant with its menu and reviews.
///
/// The restaurant record and the menu-item collection are fetched on every
/// visit. A failed restaurant fetch renders its error once; a failed menu or
/// review fetch renders the page with that section empty.
#[instrument(skip(state, store), fields(restaurant_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
    OriginalUri(uri): OriginalUri,
    mut store: ViewStore,
) -> Result<Response> {
    let api = state.api();

    thunks::get_restaurant(api, store.state_mut(), id).await;
    if let Err(e) = thunks::get_menu_items(api, store.state_mut()).await {
        warn!(error = %e, "Failed to load menu items");
    }
    if let Err(e) = thunks::get_reviews_for_restaurant(api, store.state_mut(), id).await {
        warn!(error = %e, "Failed to load reviews");
    }

    let view = RestaurantDetailView::from_store(store.state(), id);
    let chrome = PageChrome::take(store.state_mut(), uri.path());
    store.save().await?;

    Ok(match view {
        RestaurantDetailView::Loaded(restaurant) => RestaurantShowTemplate {
            chrome,
            restaurant: *restaurant,
        }
        .into_response(),
        RestaurantDetailView::Error(message) => RestaurantStatusTemplate {
            chrome,
            message: format!("Error: {message}"),
        }
        .into_response(),
        RestaurantDetailView::Loading => RestaurantStatusTemplate {
            chrome,
            message: "Loading...".to_string(),
        }
        .into_response(),
    })
}
