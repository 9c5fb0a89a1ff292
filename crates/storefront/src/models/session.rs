//! Session-related types.
//!
//! Types stored in the session for the customer currently browsing.

use serde::{Deserialize, Serialize};

use ducktastic_core::{BasketId, CustomerId};

use crate::api::Customer;

/// Session-stored customer identity.
///
/// A copy of the API customer record minus the password. A fresh session
/// holds the guest (ID 0) until someone logs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCustomer {
    /// Customer ID; basket operations are keyed on it.
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub basket_id: Option<BasketId>,
}

impl SessionCustomer {
    /// The built-in guest identity used before the API has been asked.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            id: CustomerId::GUEST,
            first_name: "Guest".to_string(),
            last_name: String::new(),
            email: String::new(),
            basket_id: None,
        }
    }

    /// Whether nobody is logged in.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.id.is_guest()
    }

    /// `"First Last"`, or just the first name.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

impl Default for SessionCustomer {
    fn default() -> Self {
        Self::guest()
    }
}

impl From<&Customer> for SessionCustomer {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.customer_id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            basket_id: customer.basket_id,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";
}
