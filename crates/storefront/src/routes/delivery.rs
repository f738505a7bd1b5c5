//! Delivery/pickup toggle.

use axum::{Form, response::Redirect};
use nom_now_core::DeliveryMethod;
use serde::Deserialize;
use tracing::instrument;

use super::local_path;
use crate::error::{AppError, Result};
use crate::middleware::ViewStore;
use crate::thunks;

#[derive(Debug, Deserialize)]
pub struct DeliveryMethodForm {
    pub method: String,
    pub return_to: Option<String>,
}

/// Switch the visitor's delivery method. Both toggles read the same value.
#[instrument(skip(store))]
pub async fn set(mut store: ViewStore, Form(form): Form<DeliveryMethodForm>) -> Result<Redirect> {
    let method: DeliveryMethod = form
        .method
        .parse()
        .map_err(|e: nom_now_core::UnknownDeliveryMethod| AppError::BadRequest(e.to_string()))?;

    thunks::set_delivery_method(store.state_mut(), method);
    store.save().await?;

    Ok(Redirect::to(&local_path(form.return_to.as_deref(), "/")))
}
