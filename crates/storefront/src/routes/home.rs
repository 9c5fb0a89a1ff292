//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::api::Product;
use crate::error::Result;
use crate::filters;
use crate::middleware::CustomerSession;
use crate::routes::NavView;
use crate::state::AppState;

/// How many products the "Newly added" carousel shows.
const NEWEST_LIMIT: usize = 6;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavView,
    pub newest: Vec<Product>,
    pub categories: Vec<String>,
}

/// Display the home page.
///
/// # Errors
///
/// Returns `AppError::Api` if the catalog cannot be fetched.
#[instrument(skip(state, customer))]
pub async fn home(
    State(state): State<AppState>,
    customer: CustomerSession,
) -> Result<impl IntoResponse> {
    let products = state.api().products().await?;

    Ok(HomeTemplate {
        nav: NavView::from(customer.customer()),
        categories: categories(&products),
        newest: newest(products, NEWEST_LIMIT),
    })
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the API.
pub async fn health() -> &'static str {
    "ok"
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Most recently added products first (highest ID), at most `limit`.
fn newest(mut products: Vec<Product>, limit: usize) -> Vec<Product> {
    products.sort_by(|a, b| b.product_id.cmp(&a.product_id));
    products.truncate(limit);
    products
}

/// Distinct category names, sorted, compared case-insensitively.
pub(crate) fn categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for category in products.iter().filter_map(|p| p.category.as_deref()) {
        let category = category.trim();
        if !category.is_empty() && !categories.iter().any(|c| c.eq_ignore_ascii_case(category)) {
            categories.push(category.to_string());
        }
    }
    categories.sort_by_key(|c| c.to_lowercase());
    categories
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        serde_json::from_str(
            r#"[
                {"productId": 1, "productName": "Rubber Duck", "productPrice": 50, "category": "Bath"},
                {"productId": 8, "productName": "Pirate Duck", "productPrice": 30, "category": "Costume"},
                {"productId": 3, "productName": "Disco Duck", "productPrice": 45, "category": "costume"},
                {"productId": 5, "productName": "Plain Duck", "productPrice": 20}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_newest_sorts_by_id_descending() {
        let ids: Vec<i32> = newest(catalog(), 3)
            .iter()
            .map(|p| p.product_id.as_i32())
            .collect();
        assert_eq!(ids, vec![8, 5, 3]);
    }

    #[test]
    fn test_newest_with_small_catalog() {
        assert_eq!(newest(catalog(), NEWEST_LIMIT).len(), 4);
        assert!(newest(Vec::new(), NEWEST_LIMIT).is_empty());
    }

    #[test]
    fn test_categories_are_distinct() {
        assert_eq!(categories(&catalog()), vec!["Bath", "Costume"]);
    }
}
