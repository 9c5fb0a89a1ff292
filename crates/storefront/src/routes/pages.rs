//! Static content page route handlers.
//!
//! Serves markdown pages loaded at startup, plus the 404 fallback.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{OriginalUri, Path, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CustomerSession;
use crate::routes::NavView;
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub nav: NavView,
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
}

/// Serve a content page by slug.
fn serve_content_page(
    state: &AppState,
    customer: &CustomerSession,
    slug: &str,
) -> Result<ContentPageTemplate> {
    let page = state
        .content()
        .get_page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        nav: NavView::from(customer.customer()),
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        updated_at: page.meta.updated_at,
        content_html: page.content_html.clone(),
    })
}

/// Display the About page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, customer))]
pub async fn about(
    State(state): State<AppState>,
    customer: CustomerSession,
) -> Result<impl IntoResponse> {
    serve_content_page(&state, &customer, "about")
}

/// Display any markdown page by slug.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, customer))]
pub async fn show(
    State(state): State<AppState>,
    customer: CustomerSession,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    serve_content_page(&state, &customer, &slug)
}

/// Fallback for unknown routes.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Create the pages routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(about))
        .route("/pages/{slug}", get(show))
}
