//! Ducktastic REST API client implementation.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use ducktastic_core::{CustomerId, LineItem, ProductId};

use super::ApiError;
use super::types::{Customer, NewCustomer, Product};
use crate::config::ApiConfig;

/// How much of an error body ends up in the logs.
const LOGGED_BODY_CHARS: usize = 500;

// =============================================================================
// DucktasticClient
// =============================================================================

/// Client for the Ducktastic REST API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct DucktasticClient {
    inner: Arc<DucktasticClientInner>,
}

struct DucktasticClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl DucktasticClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built (TLS
    /// backend initialisation failure).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(DucktasticClientInner {
                client: builder.build()?,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Fetch every customer, passwords included.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.get_json("/customers").await
    }

    /// Fetch the guest customer record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn guest_customer(&self) -> Result<Customer, ApiError> {
        self.get_json("/customers/guest").await
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the body.
    #[instrument(skip(self, customer), fields(email = %customer.email))]
    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<(), ApiError> {
        self.send(Method::POST, "/customers", Some(customer)).await?;
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("/products").await
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        self.get_json(&format!("/products/{product_id}")).await
    }

    // =========================================================================
    // Baskets
    // =========================================================================

    /// Fetch the raw line-items of a customer's basket (one per unit).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn basket(&self, customer_id: CustomerId) -> Result<Vec<LineItem>, ApiError> {
        self.get_json(&format!("/baskets/{customer_id}")).await
    }

    /// Add one unit of a product to a customer's basket.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self), fields(customer_id = %customer_id, product_id = %product_id))]
    pub async fn add_to_basket(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        let path = format!("/baskets/{customer_id}/{product_id}");
        self.send::<()>(Method::PUT, &path, None).await?;
        Ok(())
    }

    /// Remove one unit of a product from a customer's basket.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self), fields(customer_id = %customer_id, product_id = %product_id))]
    pub async fn remove_from_basket(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        let path = format!("/baskets/{customer_id}/{product_id}");
        self.send::<()>(Method::DELETE, &path, None).await?;
        Ok(())
    }

    /// Remove every line-item from a customer's basket.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn clear_basket(&self, customer_id: CustomerId) -> Result<(), ApiError> {
        let path = format!("/baskets/{customer_id}");
        self.send::<()>(Method::DELETE, &path, None).await?;
        Ok(())
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    /// GET a path and parse the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send::<()>(Method::GET, path, None).await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %truncate(&body),
                "Failed to parse Ducktastic API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request and return the body of a successful response.
    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, ApiError> {
        debug!(%method, path, "Ducktastic API request");

        let mut request = self.inner.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            tracing::error!(
                %status,
                %method,
                path,
                body = %truncate(&response_text),
                "Ducktastic API returned non-success status"
            );
            return Err(ApiError::Status {
                method,
                path: path.to_string(),
                status,
            });
        }

        Ok(response_text)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn truncate(body: &str) -> String {
    body.chars().take(LOGGED_BODY_CHARS).collect()
}
