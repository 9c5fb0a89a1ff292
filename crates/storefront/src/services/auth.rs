//! Authentication service.
//!
//! The Ducktastic API has no login endpoint: it hands out the full customer
//! list, passwords included, and the storefront matches credentials itself.
//! Signup validates locally and then creates the customer through the API.

use secrecy::SecretString;
use thiserror::Error;
use tracing::instrument;

use ducktastic_core::{Email, EmailError};

use crate::api::{ApiError, Customer, DucktasticClient, NewCustomer};

/// Minimum password length for new accounts.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during login or signup.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No customer with this email and password.
    #[error("email and password does not exist")]
    InvalidCredentials,

    /// A required name field was left blank.
    #[error("{0} is required")]
    MissingName(&'static str),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Another customer already uses the email.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Whether the customer can fix this by editing the form.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Api(_))
    }
}

/// Raw signup form input.
#[derive(Debug)]
pub struct SignupInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl SignupInput {
    /// Check the form and build the API body.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found, in form order.
    pub fn validate(self) -> Result<NewCustomer, AuthError> {
        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            return Err(AuthError::MissingName("first name"));
        }
        let last_name = self.last_name.trim();
        if last_name.is_empty() {
            return Err(AuthError::MissingName("last name"));
        }

        let email = Email::parse(&self.email)?;

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword);
        }
        if self.password != self.password_confirmation {
            return Err(AuthError::PasswordMismatch);
        }

        Ok(NewCustomer {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email,
            password: SecretString::from(self.password),
        })
    }
}

/// Find the customer whose email and password both match exactly.
#[must_use]
pub fn find_customer<'a>(
    customers: &'a [Customer],
    email: &str,
    password: &str,
) -> Option<&'a Customer> {
    customers
        .iter()
        .find(|customer| customer.has_credentials(email, password))
}

/// Authentication service.
pub struct AuthService<'a> {
    api: &'a DucktasticClient,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(api: &'a DucktasticClient) -> Self {
        Self { api }
    }

    /// Look up a customer by email and password, both matched exactly.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if nobody matches, or
    /// `AuthError::Api` if the customer list cannot be fetched.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Customer, AuthError> {
        let customers = self.api.customers().await?;
        find_customer(&customers, email, password)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Validate the form, create the customer, and return the stored record.
    ///
    /// `POST /customers` does not echo the new record, so the customer list
    /// is read back to pick up the assigned ID.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `AuthError::EmailTaken`, or
    /// `AuthError::Api` if any API call fails.
    #[instrument(skip_all)]
    pub async fn signup(&self, input: SignupInput) -> Result<Customer, AuthError> {
        let password = input.password.clone();
        let new_customer = input.validate()?;

        let customers = self.api.customers().await?;
        if customers
            .iter()
            .any(|c| c.email.eq_ignore_ascii_case(new_customer.email.as_str()))
        {
            return Err(AuthError::EmailTaken);
        }

        self.api.create_customer(&new_customer).await?;
        tracing::info!(email = %new_customer.email, "Customer created");

        let customers = self.api.customers().await?;
        find_customer(&customers, new_customer.email.as_str(), &password)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("/customers".to_string()).into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn customers() -> Vec<Customer> {
        serde_json::from_str(
            r#"[
                {"customerId": 0, "firstName": "Guest"},
                {"customerId": 1, "firstName": "Anders", "lastName": "And", "email": "anders@ducktastic.dk", "password": "quack1234"},
                {"customerId": 2, "firstName": "Andersine", "lastName": "And", "email": "andersine@ducktastic.dk", "password": "quack1234"}
            ]"#,
        )
        .unwrap()
    }

    fn signup(email: &str, password: &str, confirmation: &str) -> SignupInput {
        SignupInput {
            first_name: "Rip".to_string(),
            last_name: "And".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        }
    }

    #[test]
    fn test_find_customer_exact_match() {
        let list = customers();
        let found = find_customer(&list, "andersine@ducktastic.dk", "quack1234").unwrap();
        assert_eq!(found.customer_id.as_i32(), 2);
    }

    #[test]
    fn test_find_customer_rejects_partial_matches() {
        let list = customers();
        assert!(find_customer(&list, "anders@ducktastic.dk", "wrong").is_none());
        assert!(find_customer(&list, "nobody@ducktastic.dk", "quack1234").is_none());
        assert!(find_customer(&list, "", "").is_none());
        assert!(find_customer(&list, " anders@ducktastic.dk", "quack1234").is_none());
        assert!(find_customer(&list, "Anders@ducktastic.dk", "quack1234").is_none());
    }

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "email and password does not exist"
        );
    }

    #[test]
    fn test_signup_validation() {
        let body = signup(" rip@ducktastic.dk ", "rap-rup-1", "rap-rup-1")
            .validate()
            .unwrap();
        assert_eq!(body.email.as_str(), "rip@ducktastic.dk");
        assert_eq!(body.password.expose_secret(), "rap-rup-1");

        assert!(matches!(
            signup("rip@ducktastic.dk", "short", "short").validate(),
            Err(AuthError::WeakPassword)
        ));
        assert!(matches!(
            signup("rip@ducktastic.dk", "rap-rup-1", "rap-rup-2").validate(),
            Err(AuthError::PasswordMismatch)
        ));
        assert!(matches!(
            signup("not-an-email", "rap-rup-1", "rap-rup-1").validate(),
            Err(AuthError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_signup_requires_names() {
        let mut input = signup("rip@ducktastic.dk", "rap-rup-1", "rap-rup-1");
        input.last_name = "   ".to_string();
        assert!(matches!(
            input.validate(),
            Err(AuthError::MissingName("last name"))
        ));
    }

    #[test]
    fn test_is_user_error() {
        assert!(AuthError::EmailTaken.is_user_error());
        assert!(!AuthError::Api(ApiError::NotFound("/customers".to_string())).is_user_error());
    }
}
