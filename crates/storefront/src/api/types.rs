//! Ducktastic API wire types.
//!
//! Field names follow the API's camelCase JSON. Basket line-items live in
//! `ducktastic_core` since the aggregation works on them directly.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use ducktastic_core::{BasketId, CustomerId, Email, Price, ProductId};

pub use ducktastic_core::LineItem;

/// A customer record.
///
/// The API returns the plaintext password with every customer; it is kept
/// in a `SecretString` so it never ends up in logs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: CustomerId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_password")]
    pub password: Option<SecretString>,
    #[serde(default)]
    pub basket_id: Option<BasketId>,
}

impl Customer {
    /// Whether the email and password both match exactly.
    #[must_use]
    pub fn has_credentials(&self, email: &str, password: &str) -> bool {
        self.email == email
            && self
                .password
                .as_ref()
                .is_some_and(|secret| secret.expose_secret() == password)
    }
}

fn deserialize_password<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

/// Body for `POST /customers`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(serialize_with = "serialize_password")]
    pub password: SecretString,
}

fn serialize_password<S>(password: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(password.expose_secret())
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_price: Price,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub img_src: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// Whether the product belongs to a category (case-insensitive).
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(category.trim()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_from_api() {
        let json = r#"{
            "customerId": 4,
            "firstName": "Anders",
            "lastName": "And",
            "email": "anders@ducktastic.dk",
            "password": "quack1234",
            "basketId": 4
        }"#;
        let customer: Customer = serde_json::from_str(json).unwrap();

        assert_eq!(customer.customer_id, CustomerId::new(4));
        assert_eq!(customer.basket_id, Some(BasketId::new(4)));
        assert!(customer.has_credentials("anders@ducktastic.dk", "quack1234"));
        assert!(!customer.has_credentials("anders@ducktastic.dk", "quack"));
        assert!(!customer.has_credentials("ANDERS@ducktastic.dk", "quack1234"));
    }

    #[test]
    fn test_guest_record() {
        let json = r#"{"customerId": 0, "firstName": "Guest"}"#;
        let guest: Customer = serde_json::from_str(json).unwrap();

        assert!(guest.customer_id.is_guest());
        assert!(guest.password.is_none());
        assert!(!guest.has_credentials("", ""));
    }

    #[test]
    fn test_customer_debug_hides_password() {
        let json = r#"{"customerId": 1, "firstName": "A", "email": "a@b.c", "password": "hunter22"}"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert!(!format!("{customer:?}").contains("hunter22"));
    }

    #[test]
    fn test_new_customer_body() {
        let body = NewCustomer {
            first_name: "Rip".to_string(),
            last_name: "And".to_string(),
            email: Email::parse("rip@ducktastic.dk").unwrap(),
            password: SecretString::from("rap-rup-1".to_string()),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["firstName"], "Rip");
        assert_eq!(value["email"], "rip@ducktastic.dk");
        assert_eq!(value["password"], "rap-rup-1");
    }

    #[test]
    fn test_product_category_match() {
        let json = r#"{"productId": 2, "productName": "Pirate Duck", "productPrice": 30, "category": "Costume"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert!(product.in_category("costume"));
        assert!(product.in_category(" Costume "));
        assert!(!product.in_category("bath"));
        assert_eq!(product.product_description, "");
    }
}
