//! Core types for Ducktastic.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod basket;
pub mod email;
pub mod id;
pub mod price;

pub use basket::{Basket, BasketRow, LineItem};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
