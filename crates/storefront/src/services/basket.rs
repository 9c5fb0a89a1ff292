//! Basket operations on top of the Ducktastic API.
//!
//! Every mutation is fire-and-refetch: the API's PUT/DELETE responses carry
//! nothing useful, so after each one the basket is read back and aggregated
//! again. What the customer sees is always the API's state, never a local
//! guess.

use tracing::{debug, warn};

use ducktastic_core::{Basket, CustomerId, LineItem, ProductId};

use crate::api::{ApiError, DucktasticClient};

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot feedback message rendered above the basket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: &'static str,
}

impl Notice {
    pub const BASKET_EMPTY: Self = Self::error("You have no products in the basket");
    pub const BOUGHT: Self = Self::success("You just bought all your products in the basket");
    pub const BUY_FAILED: Self = Self::error("Something went wrong while buying products");

    #[must_use]
    pub const fn success(message: &'static str) -> Self {
        Self {
            kind: NoticeKind::Success,
            message,
        }
    }

    #[must_use]
    pub const fn error(message: &'static str) -> Self {
        Self {
            kind: NoticeKind::Error,
            message,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

/// Result of "buy all": the basket as re-read afterwards and what to tell
/// the customer.
#[derive(Debug, Clone)]
pub struct BuyAllOutcome {
    pub basket: Basket,
    pub notice: Notice,
}

/// Basket gateway.
///
/// Thin wrapper over the API's basket resource that pairs each mutation with
/// the re-fetch.
pub struct BasketGateway<'a> {
    api: &'a DucktasticClient,
}

impl<'a> BasketGateway<'a> {
    #[must_use]
    pub const fn new(api: &'a DucktasticClient) -> Self {
        Self { api }
    }

    // =========================================================================
    // Raw API Calls
    // =========================================================================

    /// `GET /baskets/{customerId}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn fetch_basket(&self, customer_id: CustomerId) -> Result<Vec<LineItem>, ApiError> {
        self.api.basket(customer_id).await
    }

    /// `PUT /baskets/{customerId}/{productId}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn increment(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        self.api.add_to_basket(customer_id, product_id).await
    }

    /// `DELETE /baskets/{customerId}/{productId}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn decrement(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        self.api.remove_from_basket(customer_id, product_id).await
    }

    /// `DELETE /baskets/{customerId}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn clear(&self, customer_id: CustomerId) -> Result<(), ApiError> {
        self.api.clear_basket(customer_id).await
    }

    // =========================================================================
    // Fire-and-refetch
    // =========================================================================

    /// Fetch and aggregate a customer's basket.
    ///
    /// # Errors
    ///
    /// Returns an error if the basket cannot be read.
    pub async fn load(&self, customer_id: CustomerId) -> Result<Basket, ApiError> {
        let items = self.fetch_basket(customer_id).await?;
        debug!(customer_id = %customer_id, units = items.len(), "Basket loaded");
        Ok(Basket::aggregate(items))
    }

    /// Add one unit, then re-read the basket.
    ///
    /// A failed PUT is logged; the re-read still happens so the page shows
    /// whatever the API actually holds.
    ///
    /// # Errors
    ///
    /// Returns an error only if the re-read fails.
    pub async fn add_one(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<Basket, ApiError> {
        if let Err(e) = self.increment(customer_id, product_id).await {
            warn!(customer_id = %customer_id, product_id = %product_id, error = %e, "Failed to add product to basket");
        }
        self.load(customer_id).await
    }

    /// Remove one unit, then re-read the basket.
    ///
    /// # Errors
    ///
    /// Returns an error only if the re-read fails.
    pub async fn remove_one(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<Basket, ApiError> {
        if let Err(e) = self.decrement(customer_id, product_id).await {
            warn!(customer_id = %customer_id, product_id = %product_id, error = %e, "Failed to remove product from basket");
        }
        self.load(customer_id).await
    }

    /// "Buy all": empty the basket.
    ///
    /// The emptiness check runs against a fresh read, so an empty basket
    /// never reaches the DELETE. No order is recorded anywhere.
    ///
    /// # Errors
    ///
    /// Returns an error if either basket read fails. A failed DELETE is not
    /// an error; it becomes [`Notice::BUY_FAILED`].
    pub async fn buy_all(&self, customer_id: CustomerId) -> Result<BuyAllOutcome, ApiError> {
        let basket = self.load(customer_id).await?;
        if basket.is_empty() {
            return Ok(BuyAllOutcome {
                basket,
                notice: Notice::BASKET_EMPTY,
            });
        }

        let notice = match self.clear(customer_id).await {
            Ok(()) => {
                tracing::info!(
                    customer_id = %customer_id,
                    units = basket.item_count(),
                    total = %basket.total(),
                    "Basket bought"
                );
                Notice::BOUGHT
            }
            Err(e) => {
                tracing::error!(customer_id = %customer_id, error = %e, "Failed to buy basket");
                Notice::BUY_FAILED
            }
        };

        Ok(BuyAllOutcome {
            basket: self.load(customer_id).await?,
            notice,
        })
    }
}
