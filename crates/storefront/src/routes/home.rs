//! Restaurant list (home page).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, State},
    response::IntoResponse,
};
use nom_now_core::Restaurant;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::ViewStore;
use crate::state::AppState;
use crate::thunks;
use crate::views::PageChrome;

/// Restaurant card display data for templates.
#[derive(Clone)]
pub struct RestaurantCardView {
    pub href: String,
    pub name: String,
    pub image: Option<String>,
    pub cuisine_type: Option<String>,
    pub price_level: Option<String>,
    pub delivery_time: Option<String>,
    pub delivery_fee: String,
}

impl From<&Restaurant> for RestaurantCardView {
    fn from(restaurant: &Restaurant) -> Self {
        Self {
            href: format!("/restaurants/{}", restaurant.id),
            name: restaurant.name.clone(),
            image: restaurant.store_image.clone(),
            cuisine_type: restaurant.cuisine_type.clone(),
            price_level: restaurant.price_level.clone(),
            delivery_time: restaurant.delivery_time_label(),
            delivery_fee: restaurant.delivery_fee_label(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "restaurants/index.html")]
pub struct HomeTemplate {
    pub chrome: PageChrome,
    pub restaurants: Vec<RestaurantCardView>,
}

/// Display the restaurant list.
#[instrument(skip(state, store))]
pub async fn home(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    mut store: ViewStore,
) -> Result<impl IntoResponse> {
    thunks::get_restaurants(state.api(), store.state_mut()).await?;

    let restaurants = store
        .state()
        .restaurants
        .list
        .iter()
        .map(RestaurantCardView::from)
        .collect();
    let chrome = PageChrome::take(store.state_mut(), uri.path());
    store.save().await?;

    Ok(HomeTemplate {
        chrome,
        restaurants,
    })
}
