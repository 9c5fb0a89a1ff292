//! Authentication route handlers.
//!
//! Login matches credentials against the API's customer list; signup
//! creates a customer through the API and logs them straight in.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CustomerSession;
use crate::routes::NavView;
use crate::services::{AuthError, AuthService, SignupInput};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: NavView,
    pub email: String,
    pub error: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub nav: NavView,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(customer: CustomerSession) -> impl IntoResponse {
    LoginTemplate {
        nav: NavView::from(customer.customer()),
        email: String::new(),
        error: None,
    }
}

/// Handle login form submission.
///
/// On a match the session's customer is replaced and the browser goes home.
/// Otherwise the form comes back with a 401 and the session is untouched.
///
/// # Errors
///
/// Returns `AppError::Api` if the customer list cannot be fetched.
#[instrument(skip(state, customer, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    mut customer: CustomerSession,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AuthService::new(state.api())
        .login(&form.email, &form.password)
        .await
    {
        Ok(found) => {
            customer.login(&found).await?;
            add_breadcrumb("auth", "Logged in", None);
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login failed: no matching customer");
            Ok((
                StatusCode::UNAUTHORIZED,
                LoginTemplate {
                    nav: NavView::from(customer.customer()),
                    email: form.email,
                    error: Some(AuthError::InvalidCredentials.to_string()),
                },
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle logout.
///
/// Swaps the session's customer for the API's guest record. If that record
/// cannot be fetched the customer stays logged in.
///
/// # Errors
///
/// Returns `AppError::Session` if the session cannot be written.
#[instrument(skip(state, customer))]
pub async fn logout(
    State(state): State<AppState>,
    mut customer: CustomerSession,
) -> Result<Redirect> {
    if customer.logout(state.api()).await? {
        add_breadcrumb("auth", "Logged out", None);
    }
    Ok(Redirect::to("/"))
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(customer: CustomerSession) -> impl IntoResponse {
    SignupTemplate {
        nav: NavView::from(customer.customer()),
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
        error: None,
    }
}

/// Handle signup form submission.
///
/// # Errors
///
/// Returns `AppError::Auth` wrapping an API failure if the customer cannot
/// be created; validation problems re-render the form instead.
#[instrument(skip(state, customer, form), fields(email = %form.email))]
pub async fn signup(
    State(state): State<AppState>,
    mut customer: CustomerSession,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let input = SignupInput {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        email: form.email.clone(),
        password: form.password,
        password_confirmation: form.password_confirm,
    };

    match AuthService::new(state.api()).signup(input).await {
        Ok(created) => {
            customer.login(&created).await?;
            add_breadcrumb("auth", "Signed up", None);
            Ok(Redirect::to("/").into_response())
        }
        Err(e) if e.is_user_error() => {
            let message = e.to_string();
            tracing::info!(reason = %message, "Signup rejected");
            Ok((
                AppError::Auth(e).status(),
                SignupTemplate {
                    nav: NavView::from(customer.customer()),
                    first_name: form.first_name,
                    last_name: form.last_name,
                    email: form.email,
                    error: Some(message),
                },
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
