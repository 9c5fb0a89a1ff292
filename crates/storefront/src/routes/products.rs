//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use ducktastic_core::ProductId;

use crate::api::{ApiError, Product};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CustomerSession;
use crate::routes::NavView;
use crate::routes::home::categories;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nav: NavView,
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    pub category: Option<String>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavView,
    pub product: Product,
}

/// Display the product listing, optionally filtered by category.
///
/// # Errors
///
/// Returns `AppError::Api` if the catalog cannot be fetched.
#[instrument(skip(state, customer))]
pub async fn index(
    State(state): State<AppState>,
    customer: CustomerSession,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let all = state.api().products().await?;
    let categories = categories(&all);

    let category = query
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let products = match &category {
        Some(category) => all.into_iter().filter(|p| p.in_category(category)).collect(),
        None => all,
    };

    Ok(ProductsIndexTemplate {
        nav: NavView::from(customer.customer()),
        products,
        categories,
        category,
    })
}

/// Display a single product.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the API has no such product, or
/// `AppError::Api` for any other API failure.
#[instrument(skip(state, customer))]
pub async fn show(
    State(state): State<AppState>,
    customer: CustomerSession,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let product_id = ProductId::new(id);
    let product = state
        .api()
        .product(product_id)
        .await
        .map_err(|e| match e {
            ApiError::NotFound(_) => AppError::NotFound(format!("product {product_id}")),
            other => AppError::Api(other),
        })?;

    let product_id = product_id.to_string();
    add_breadcrumb("navigation", "Viewed product", Some(&[("product_id", product_id.as_str())]));

    Ok(ProductShowTemplate {
        nav: NavView::from(customer.customer()),
        product,
    })
}
