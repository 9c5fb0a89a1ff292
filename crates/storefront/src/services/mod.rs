//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Login against the customer list and signup
//! - `basket` - Basket mutations with fire-and-refetch semantics

pub mod auth;
pub mod basket;

pub use auth::{AuthError, AuthService, SignupInput};
pub use basket::{BasketGateway, BuyAllOutcome, Notice, NoticeKind};
