//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Adding a dish looks it up on
//! the backend once the visitor is known to be logged in, so the price and
//! restaurant come from the menu rather than the posted form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{OriginalUri, State},
    response::{IntoResponse, Redirect},
};
use nom_now_core::MenuItemId;
use serde::Deserialize;
use tracing::{info, instrument};

use super::local_path;
use crate::error::Result;
use crate::filters;
use crate::middleware::ViewStore;
use crate::state::AppState;
use crate::thunks;
use crate::views::{CartView, PageChrome};

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub chrome: PageChrome,
    pub cart: CartView,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub menu_item_id: MenuItemId,
    pub return_to: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub menu_item_id: MenuItemId,
}

/// Display the cart page.
#[instrument(skip(store))]
pub async fn show(OriginalUri(uri): OriginalUri, mut store: ViewStore) -> Result<impl IntoResponse> {
    let cart = CartView::from(&store.state().cart);
    let chrome = PageChrome::take(store.state_mut(), uri.path());
    store.save().await?;

    Ok(CartShowTemplate { chrome, cart })
}

/// Add one unit of a dish.
///
/// A refused add (logged out, or another restaurant's cart) becomes a
/// notice on the page the visitor returns to; the cart is left untouched.
#[instrument(skip(state, store))]
pub async fn add(
    State(state): State<AppState>,
    mut store: ViewStore,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    if store.state().session_user.is_none() {
        info!("Add to cart refused for a guest");
        thunks::notify(store.state_mut(), thunks::LOGIN_REQUIRED_MESSAGE.to_string());
        store.save().await?;
        return Ok(Redirect::to(&local_path(form.return_to.as_deref(), "/")));
    }

    let item = thunks::get_menu_item(state.api(), form.menu_item_id).await?;
    let fallback = format!("/restaurants/{}", item.restaurant_id);

    if let Err(e) = thunks::add_to_cart(store.state_mut(), &item, item.restaurant_id) {
        info!(reason = %e, "Add to cart refused");
        thunks::notify(store.state_mut(), e.to_string());
    }
    store.save().await?;

    Ok(Redirect::to(&local_path(form.return_to.as_deref(), &fallback)))
}

/// Remove a dish from the cart.
#[instrument(skip(store))]
pub async fn remove(
    mut store: ViewStore,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    thunks::remove_from_cart(store.state_mut(), form.menu_item_id);
    store.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(store))]
pub async fn clear(mut store: ViewStore) -> Result<Redirect> {
    thunks::clear_cart(store.state_mut());
    store.save().await?;
    Ok(Redirect::to("/cart"))
}
