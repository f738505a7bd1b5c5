//! Per-visitor view-state store backed by the session.

use axum::{extract::FromRequestParts, http::request::Parts};
use nom_now_core::ViewState;
use tower_sessions::Session;
use tracing::{Span, warn};

use crate::error::AppError;

/// Session key holding the serialized [`ViewState`].
pub const VIEW_STATE_KEY: &str = "view_state";

/// Extractor that loads the visitor's [`ViewState`] from the session.
///
/// Only the session-owned slice survives between requests; backend data
/// starts empty and is filled by thunks. Call [`ViewStore::save`] after
/// dispatching so the next request sees the change.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut store: ViewStore) -> Result<Redirect> {
///     thunks::clear_cart(store.state_mut());
///     store.save().await?;
///     Ok(Redirect::to("/cart"))
/// }
/// ```
pub struct ViewStore {
    session: Session,
    state: ViewState,
}

impl ViewStore {
    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    /// Issue a new session id, keeping the data. Used on sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the change.
    pub async fn rotate(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.cycle_id().await
    }

    /// Persist the session slice.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn save(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(VIEW_STATE_KEY, &self.state).await
    }
}

impl<S> FromRequestParts<S> for ViewStore
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("Session layer is not installed".to_string()))?;

        let state = match session.get::<ViewState>(VIEW_STATE_KEY).await {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                // An unreadable slice is dropped rather than locking the visitor out.
                warn!(error = %e, "Discarding unreadable view state");
                ViewState::default()
            }
        };

        if let Some(user) = &state.session_user {
            Span::current().record("user_id", user.id.as_i32());
        }

        Ok(Self { session, state })
    }
}
