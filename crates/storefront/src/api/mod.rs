//! Client for the Ducktastic REST API.
//!
//! # Architecture
//!
//! - The API is the single source of truth - nothing is cached or synced
//!   locally, every page render reads fresh data
//! - Plain JSON over HTTP via `reqwest`; requests carry no credentials
//! - Mutations return nothing useful, so callers re-fetch afterwards
//!
//! # Resources
//!
//! ```text
//! GET    /customers                          all customers (with passwords)
//! POST   /customers                          create a customer
//! GET    /customers/guest                    the guest customer record
//! GET    /products                           all products
//! GET    /products/{productId}               one product
//! GET    /baskets/{customerId}               basket line-items
//! PUT    /baskets/{customerId}/{productId}   add one unit
//! DELETE /baskets/{customerId}/{productId}   remove one unit
//! DELETE /baskets/{customerId}               clear the basket
//! ```

mod client;
pub mod types;

pub use client::DucktasticClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the Ducktastic API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("{method} {path} returned {status}")]
    Status {
        method: reqwest::Method,
        path: String,
        status: reqwest::StatusCode,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}
