//! Domain models for storefront.

pub mod session;

pub use session::{SessionCustomer, keys as session_keys};
