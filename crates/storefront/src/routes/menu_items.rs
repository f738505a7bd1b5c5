//! Menu item detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, Path, State},
    response::IntoResponse,
};
use nom_now_core::{MenuItem, MenuItemId};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::ViewStore;
use crate::state::AppState;
use crate::thunks;
use crate::views::{AddToCartButton, PageChrome};

/// Menu item display data for templates.
#[derive(Clone)]
pub struct MenuItemView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub food_type: Option<String>,
    pub description: Option<String>,
    pub food_image: Option<String>,
    pub restaurant_href: String,
    pub button: AddToCartButton,
}

impl MenuItemView {
    fn new(item: &MenuItem, button: AddToCartButton) -> Self {
        Self {
            id: item.id.as_i32(),
            name: item.name.clone(),
            price: item.price.to_string(),
            food_type: item.food_type.clone(),
            description: item.description.clone(),
            food_image: item.food_image.clone(),
            restaurant_href: format!("/restaurants/{}", item.restaurant_id),
            button,
        }
    }
}

/// Menu item page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu_items/show.html")]
pub struct MenuItemShowTemplate {
    pub chrome: PageChrome,
    pub item: MenuItemView,
}

/// Display one dish. Unknown ids answer 404 "Menu item couldn't be found".
#[instrument(skip(state, store), fields(menu_item_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<MenuItemId>,
    OriginalUri(uri): OriginalUri,
    mut store: ViewStore,
) -> Result<impl IntoResponse> {
    let item = thunks::get_menu_item(state.api(), id).await?;

    let button = AddToCartButton::for_cart(store.state(), item.restaurant_id);
    let chrome = PageChrome::take(store.state_mut(), uri.path());
    store.save().await?;

    Ok(MenuItemShowTemplate {
        chrome,
        item: MenuItemView::new(&item, button),
    })
}
