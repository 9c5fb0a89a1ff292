//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Maps an API image path to its URL under `/static/images`.
///
/// The API stores paths like `/ducks/rubber.png`; absolute `http(s)` URLs
/// pass through untouched and an empty path gets the placeholder.
///
/// Usage in templates: `{{ product.img_src|image_url }}`
#[askama::filter_fn]
pub fn image_url(img_src: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(resolve_image_url(&img_src.to_string()))
}

/// Placeholder shown when a product has no image.
const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

fn resolve_image_url(img_src: &str) -> String {
    let img_src = img_src.trim();
    if img_src.is_empty() {
        PLACEHOLDER_IMAGE.to_string()
    } else if img_src.starts_with("http://") || img_src.starts_with("https://") {
        img_src.to_string()
    } else {
        format!("/static/images/{}", img_src.trim_start_matches('/'))
    }
}
