//! Ducktastic Core - Shared types library.
//!
//! This crate provides the domain types used by the Ducktastic storefront and
//! its tests:
//! - typed IDs for customers, products and baskets
//! - a validated [`Email`]
//! - [`Price`], a decimal amount in Danish kroner
//! - [`Basket`], the aggregation of a customer's basket line-items
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O and no HTTP
//! clients. Everything that talks to the Ducktastic API lives in the
//! storefront crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
