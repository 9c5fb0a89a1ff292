//! Customer session extractors.
//!
//! The session holds exactly one [`SessionCustomer`]. Handlers read it
//! through [`CustomerSession`] and change it only through
//! [`CustomerSession::replace`] (directly, or via `login`/`logout`).
//! An empty session reads as the guest.

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::api::{Customer, DucktasticClient};
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::{SessionCustomer, session_keys};

/// Header HTMX sets on every request it makes.
const HX_REQUEST: &str = "hx-request";

/// Header that makes HTMX do a full-page redirect.
const HX_REDIRECT: &str = "hx-redirect";

/// Whether a request came from HTMX.
#[must_use]
pub fn is_htmx(parts: &Parts) -> bool {
    parts
        .headers
        .get(HX_REQUEST)
        .is_some_and(|v| v.as_bytes() == b"true")
}

// =============================================================================
// CustomerSession
// =============================================================================

/// The current customer plus the handle to change it.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(customer: CustomerSession) -> impl IntoResponse {
///     format!("Hello, {}!", customer.customer().first_name)
/// }
/// ```
pub struct CustomerSession {
    session: Session,
    customer: SessionCustomer,
}

impl CustomerSession {
    /// Read the customer out of a session, falling back to the guest.
    pub async fn load(session: Session) -> Self {
        let customer = match session
            .get::<SessionCustomer>(session_keys::CURRENT_CUSTOMER)
            .await
        {
            Ok(Some(customer)) => customer,
            Ok(None) => SessionCustomer::guest(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read customer from session");
                SessionCustomer::guest()
            }
        };

        Self { session, customer }
    }

    /// The current customer.
    #[must_use]
    pub const fn customer(&self) -> &SessionCustomer {
        &self.customer
    }

    /// Replace the stored customer. The only place the session value changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write; the in-memory
    /// value is left untouched in that case.
    pub async fn replace(
        &mut self,
        customer: SessionCustomer,
    ) -> Result<(), tower_sessions::session::Error> {
        self.session
            .insert(session_keys::CURRENT_CUSTOMER, &customer)
            .await?;
        self.customer = customer;
        Ok(())
    }

    /// Log a customer in.
    ///
    /// The session ID is cycled first so a pre-login cookie cannot be reused.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn login(&mut self, customer: &Customer) -> Result<(), tower_sessions::session::Error> {
        self.session.cycle_id().await?;
        self.replace(SessionCustomer::from(customer)).await?;
        set_sentry_user(&customer.customer_id, Some(customer.email.as_str()));
        tracing::info!(customer_id = %customer.customer_id, "Customer logged in");
        Ok(())
    }

    /// Log out by swapping in the API's guest record.
    ///
    /// If the guest record cannot be fetched the current customer stays in
    /// place and `Ok(false)` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn logout(
        &mut self,
        api: &DucktasticClient,
    ) -> Result<bool, tower_sessions::session::Error> {
        let guest = match api.guest_customer().await {
            Ok(guest) => guest,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch guest customer, keeping session");
                return Ok(false);
            }
        };

        let previous = self.customer.id;
        self.replace(SessionCustomer::from(&guest)).await?;
        clear_sentry_user();
        tracing::info!(customer_id = %previous, "Customer logged out");
        Ok(true)
    }
}

impl<S> FromRequestParts<S> for CustomerSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        Ok(Self::load(session).await)
    }
}

// =============================================================================
// RequireCustomer
// =============================================================================

/// Extractor that requires a logged-in (non-guest) customer.
///
/// Guests are sent to the login page: a plain redirect for normal requests,
/// an `HX-Redirect` header for HTMX requests so the whole page navigates.
pub struct RequireCustomer(pub SessionCustomer);

/// Rejection for guests hitting a customer-only route.
pub enum GuestRejection {
    /// Redirect to login page (for full page requests).
    RedirectToLogin,
    /// `HX-Redirect` to the login page (for HTMX requests).
    HtmxRedirectToLogin,
    /// Session layer missing.
    Internal(AppError),
}

impl IntoResponse for GuestRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::HtmxRedirectToLogin => (
                StatusCode::OK,
                [(HX_REDIRECT, HeaderValue::from_static("/login"))],
            )
                .into_response(),
            Self::Internal(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = GuestRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = CustomerSession::from_request_parts(parts, state)
            .await
            .map_err(GuestRejection::Internal)?;

        if session.customer.is_guest() {
            return Err(if is_htmx(parts) {
                GuestRejection::HtmxRedirectToLogin
            } else {
                GuestRejection::RedirectToLogin
            });
        }

        Ok(Self(session.customer))
    }
}
