//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing (?category=)
//! GET  /products/{id}          - Product detail
//!
//! # Basket (HTMX fragments, customers only for POST)
//! GET  /basket                 - Basket page
//! POST /basket/add             - Add one unit (returns count badge)
//! POST /basket/increment       - +1 (returns basket_items fragment)
//! POST /basket/decrement       - -1 (returns basket_items fragment)
//! POST /basket/buy             - Buy all (returns basket_items fragment + notice)
//! GET  /basket/count           - Basket count badge (fragment)
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /signup                 - Signup page
//! POST /signup                 - Signup action
//! POST /logout                 - Logout action
//!
//! # Pages
//! GET  /about                  - About page (markdown)
//! GET  /pages/{slug}           - Any markdown page
//! ```
//!
//! Anything else falls through to the 404 page.

pub mod auth;
pub mod basket;
pub mod home;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::models::SessionCustomer;
use crate::state::AppState;

/// Navbar data every full page needs.
#[derive(Debug, Clone)]
pub struct NavView {
    pub first_name: String,
    pub is_guest: bool,
}

impl From<&SessionCustomer> for NavView {
    fn from(customer: &SessionCustomer) -> Self {
        Self {
            first_name: customer.first_name.clone(),
            is_guest: customer.is_guest(),
        }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the basket routes router.
pub fn basket_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(basket::show))
        .route("/add", post(basket::add))
        .route("/increment", post(basket::increment))
        .route("/decrement", post(basket::decrement))
        .route("/buy", post(basket::buy_all))
        .route("/count", get(basket::count))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .nest("/products", product_routes())
        .nest("/basket", basket_routes())
        .merge(auth_routes())
        .merge(pages::router())
        .fallback(pages::not_found)
}
