//! Basket route handlers.
//!
//! Mutations are HTMX endpoints that return fragments and fire a
//! `basket-updated` event so the navbar badge refreshes itself. Each one
//! re-reads the basket from the API after mutating.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse},
};
use serde::Deserialize;
use tracing::instrument;

use ducktastic_core::{Basket, ProductId};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CustomerSession, RequireCustomer};
use crate::routes::NavView;
use crate::services::{BasketGateway, Notice};
use crate::state::AppState;

/// HTMX response header carrying client-side events.
const HX_TRIGGER: &str = "HX-Trigger";

/// Event the navbar badge listens for.
const BASKET_UPDATED: &str = "basket-updated";

/// Form body for single-product basket actions.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: i32,
}

/// Basket page template.
#[derive(Template, WebTemplate)]
#[template(path = "basket/show.html")]
pub struct BasketShowTemplate {
    pub nav: NavView,
    pub basket: Basket,
    pub notice: Option<Notice>,
}

/// Basket items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/basket_items.html")]
pub struct BasketItemsTemplate {
    pub basket: Basket,
    pub notice: Option<Notice>,
}

/// Basket count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/basket_count.html")]
pub struct BasketCountTemplate {
    pub count: usize,
}

/// Display the basket page.
///
/// Guests see the guest basket (customer ID 0).
///
/// # Errors
///
/// Returns `AppError::Api` if the basket cannot be fetched.
#[instrument(skip(state, customer))]
pub async fn show(
    State(state): State<AppState>,
    customer: CustomerSession,
) -> Result<impl IntoResponse> {
    let basket = BasketGateway::new(state.api())
        .load(customer.customer().id)
        .await?;

    Ok(BasketShowTemplate {
        nav: NavView::from(customer.customer()),
        basket,
        notice: None,
    })
}

/// Add one unit from the product page (HTMX).
///
/// Returns the count badge with an HTMX trigger to update other elements.
///
/// # Errors
///
/// Returns `AppError::Api` if the basket cannot be re-read.
#[instrument(skip(state, customer), fields(customer_id = %customer.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse> {
    let product_id = ProductId::new(form.product_id);
    let basket = BasketGateway::new(state.api())
        .add_one(customer.id, product_id)
        .await?;

    let product_id = product_id.to_string();
    add_breadcrumb("basket", "Added product", Some(&[("product_id", product_id.as_str())]));

    Ok((
        AppendHeaders([(HX_TRIGGER, BASKET_UPDATED)]),
        BasketCountTemplate {
            count: basket.item_count(),
        },
    ))
}

/// Add one more unit of a basket row (HTMX).
///
/// # Errors
///
/// Returns `AppError::Api` if the basket cannot be re-read.
#[instrument(skip(state, customer), fields(customer_id = %customer.id))]
pub async fn increment(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse> {
    let basket = BasketGateway::new(state.api())
        .add_one(customer.id, ProductId::new(form.product_id))
        .await?;

    Ok(items_fragment(basket, None))
}

/// Remove one unit of a basket row (HTMX).
///
/// # Errors
///
/// Returns `AppError::Api` if the basket cannot be re-read.
#[instrument(skip(state, customer), fields(customer_id = %customer.id))]
pub async fn decrement(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse> {
    let basket = BasketGateway::new(state.api())
        .remove_one(customer.id, ProductId::new(form.product_id))
        .await?;

    Ok(items_fragment(basket, None))
}

/// Buy everything in the basket (HTMX).
///
/// # Errors
///
/// Returns `AppError::Api` if the basket cannot be read before or after.
#[instrument(skip(state, customer), fields(customer_id = %customer.id))]
pub async fn buy_all(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> Result<impl IntoResponse> {
    let outcome = BasketGateway::new(state.api()).buy_all(customer.id).await?;

    add_breadcrumb("basket", outcome.notice.message, None);

    Ok(items_fragment(outcome.basket, Some(outcome.notice)))
}

/// Get the navbar basket count badge (HTMX).
///
/// Guests always see 0 and no API call is made. API failures also show 0.
#[instrument(skip(state, customer))]
pub async fn count(State(state): State<AppState>, customer: CustomerSession) -> impl IntoResponse {
    let customer = customer.customer();
    let count = if customer.is_guest() {
        0
    } else {
        match BasketGateway::new(state.api()).load(customer.id).await {
            Ok(basket) => basket.item_count(),
            Err(e) => {
                tracing::warn!(customer_id = %customer.id, error = %e, "Failed to fetch basket count");
                0
            }
        }
    };

    BasketCountTemplate { count }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn items_fragment(basket: Basket, notice: Option<Notice>) -> impl IntoResponse {
    (
        AppendHeaders([(HX_TRIGGER, BASKET_UPDATED)]),
        BasketItemsTemplate { basket, notice },
    )
}
