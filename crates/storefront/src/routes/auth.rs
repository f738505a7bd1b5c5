//! Authentication route handlers.
//!
//! Credentials go straight to the backend's `/api/auth` endpoints; the user
//! record it returns is kept in the visitor's store. A rejected login or
//! signup re-renders the form with the backend's message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use nom_now_core::Email;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, Credentials, Signup};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::ViewStore;
use crate::state::AppState;
use crate::thunks;
use crate::views::PageChrome;

/// Shown when the passwords on the signup form differ.
pub const PASSWORD_MISMATCH: &str = "Confirm Password field must be the same as the Password field";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data. Empty address fields are sent as missing.
#[derive(Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl SignupForm {
    /// Validate the form into a backend request, or the message to show.
    fn into_signup(self) -> std::result::Result<Signup, String> {
        if self.password != self.confirm_password {
            return Err(PASSWORD_MISMATCH.to_string());
        }
        let username = self.username.trim().to_string();
        if username.is_empty() {
            return Err("Username is required".to_string());
        }
        let email = Email::parse(&self.email).map_err(|e| e.to_string())?;

        Ok(Signup {
            username,
            email,
            password: SecretString::from(self.password),
            first_name: non_blank(self.first_name),
            last_name: non_blank(self.last_name),
            address: non_blank(self.address),
            city: non_blank(self.city),
            state: non_blank(self.state),
            zip: non_blank(self.zip),
        })
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub chrome: PageChrome,
    pub email: String,
    pub error: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub chrome: PageChrome,
    pub username: String,
    pub email: String,
    pub error: Option<String>,
}

/// Status for a form re-rendered with an error.
const REJECTED_FORM_STATUS: StatusCode = StatusCode::UNPROCESSABLE_ENTITY;

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[instrument(skip(store))]
pub async fn login_page(
    OriginalUri(uri): OriginalUri,
    mut store: ViewStore,
) -> Result<impl IntoResponse> {
    let chrome = PageChrome::take(store.state_mut(), uri.path());
    store.save().await?;

    Ok(LoginTemplate {
        chrome,
        email: String::new(),
        error: None,
    })
}

/// Handle login form submission.
#[instrument(skip(state, store, form))]
pub async fn login(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    mut store: ViewStore,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let rejected = |store: &mut ViewStore, email: String, error: String| LoginTemplate {
        chrome: PageChrome::take(store.state_mut(), uri.path()),
        email,
        error: Some(error),
    };

    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            let page = rejected(&mut store, form.email, e.to_string());
            return Ok((REJECTED_FORM_STATUS, page).into_response());
        }
    };
    let credentials = Credentials {
        email,
        password: SecretString::from(form.password),
    };

    match thunks::login(state.api(), store.state_mut(), &credentials).await {
        Ok(user) => {
            info!(user_id = %user.id, "User logged in");
            set_sentry_user(&user.id, Some(user.email.as_str()));
            store.rotate().await?;
            store.save().await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(ApiError::Rejected { message, .. }) => {
            warn!("Login rejected");
            let page = rejected(&mut store, form.email, message);
            Ok((REJECTED_FORM_STATUS, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
#[instrument(skip(store))]
pub async fn signup_page(
    OriginalUri(uri): OriginalUri,
    mut store: ViewStore,
) -> Result<impl IntoResponse> {
    let chrome = PageChrome::take(store.state_mut(), uri.path());
    store.save().await?;

    Ok(SignupTemplate {
        chrome,
        username: String::new(),
        email: String::new(),
        error: None,
    })
}

/// Handle signup form submission.
#[instrument(skip(state, store, form))]
pub async fn signup(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    mut store: ViewStore,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let username = form.username.clone();
    let email = form.email.clone();
    let rejected = |store: &mut ViewStore, error: String| SignupTemplate {
        chrome: PageChrome::take(store.state_mut(), uri.path()),
        username: username.clone(),
        email: email.clone(),
        error: Some(error),
    };

    let signup = match form.into_signup() {
        Ok(signup) => signup,
        Err(message) => {
            let page = rejected(&mut store, message);
            return Ok((REJECTED_FORM_STATUS, page).into_response());
        }
    };

    match thunks::signup(state.api(), store.state_mut(), &signup).await {
        Ok(user) => {
            info!(user_id = %user.id, "User signed up");
            set_sentry_user(&user.id, Some(user.email.as_str()));
            store.rotate().await?;
            store.save().await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(ApiError::Rejected { message, .. }) => {
            warn!("Signup rejected");
            let page = rejected(&mut store, message);
            Ok((REJECTED_FORM_STATUS, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle logout. The cart and any open modal go with the session user.
#[instrument(skip(state, store))]
pub async fn logout(State(state): State<AppState>, mut store: ViewStore) -> Result<Redirect> {
    thunks::logout(state.api(), store.state_mut()).await;
    clear_sentry_user();
    store.save().await?;

    Ok(Redirect::to("/"))
}
