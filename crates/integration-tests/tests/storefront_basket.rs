//! Basket flows: every mutation is followed by a fresh read of the basket.
//!
//! Run with: cargo test -p ducktastic-integration-tests

use ducktastic_integration_tests::{CUSTOMER_ID, TestContext};
use reqwest::StatusCode;

fn header<'a>(resp: &'a reqwest::Response, name: &str) -> &'a str {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_basket_groups_line_items() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;
    ctx.api.fill_basket(CUSTOMER_ID, &[2, 1, 2]).await;

    let body = ctx.page("/basket").await;
    assert!(body.contains("Pirate Duck"));
    assert!(body.contains("Classic Yellow Duck"));
    // 2 x 80 + 50
    assert!(body.contains("160 DKK"));
    assert!(body.contains("210 DKK"));
}

#[tokio::test]
async fn test_increment_puts_then_refetches() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;
    ctx.api.fill_basket(CUSTOMER_ID, &[2]).await;
    ctx.api.clear_requests().await;

    let resp = ctx.htmx_post("/basket/increment", &[("product_id", "2")]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "hx-trigger"), "basket-updated");
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("id=\"basket-items\""));
    assert!(body.contains("160 DKK"));

    assert_eq!(
        ctx.api.requests().await,
        vec!["PUT /baskets/1/2", "GET /baskets/1"]
    );
    assert_eq!(ctx.api.basket_product_ids(CUSTOMER_ID).await, vec![2, 2]);
}

#[tokio::test]
async fn test_decrement_deletes_one_unit_then_refetches() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;
    ctx.api.fill_basket(CUSTOMER_ID, &[2, 2, 1]).await;
    ctx.api.clear_requests().await;

    let resp = ctx.htmx_post("/basket/decrement", &[("product_id", "2")]).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        ctx.api.requests().await,
        vec!["DELETE /baskets/1/2", "GET /baskets/1"]
    );
    assert_eq!(ctx.api.basket_product_ids(CUSTOMER_ID).await, vec![2, 1]);
}

#[tokio::test]
async fn test_failed_increment_still_refetches() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;
    ctx.api.fill_basket(CUSTOMER_ID, &[2]).await;
    ctx.api.clear_requests().await;

    // Unknown product: the API answers 404 to the PUT
    let resp = ctx.htmx_post("/basket/increment", &[("product_id", "99")]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "hx-trigger"), "basket-updated");
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Pirate Duck"));

    assert_eq!(
        ctx.api.requests().await,
        vec!["PUT /baskets/1/99", "GET /baskets/1"]
    );
    assert_eq!(ctx.api.basket_product_ids(CUSTOMER_ID).await, vec![2]);
}

#[tokio::test]
async fn test_failed_decrement_still_refetches() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;
    ctx.api.fill_basket(CUSTOMER_ID, &[2]).await;
    ctx.api.clear_requests().await;

    // Product 3 is not in the basket: the API answers 404 to the DELETE
    let resp = ctx.htmx_post("/basket/decrement", &[("product_id", "3")]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Pirate Duck"));

    assert_eq!(
        ctx.api.requests().await,
        vec!["DELETE /baskets/1/3", "GET /baskets/1"]
    );
    assert_eq!(ctx.api.basket_product_ids(CUSTOMER_ID).await, vec![2]);
}

#[tokio::test]
async fn test_decrement_last_unit_drops_row() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;
    ctx.api.fill_basket(CUSTOMER_ID, &[3]).await;

    let resp = ctx.htmx_post("/basket/decrement", &[("product_id", "3")]).await;
    let body = resp.text().await.expect("Failed to read body");
    assert!(!body.contains("Viking Duck"));
    assert!(body.contains("Your basket is empty"));
}

#[tokio::test]
async fn test_add_from_product_page_updates_count() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;

    let resp = ctx.htmx_post("/basket/add", &[("product_id", "1")]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "hx-trigger"), "basket-updated");
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains(">1<"));

    let count = ctx.page("/basket/count").await;
    assert!(count.contains(">1<"));
}

#[tokio::test]
async fn test_buy_all_on_empty_basket_sends_no_delete() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;
    ctx.api.clear_requests().await;

    let resp = ctx.htmx_post("/basket/buy", &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("You have no products in the basket"));

    let requests = ctx.api.requests().await;
    assert!(requests.iter().all(|r| !r.starts_with("DELETE")));
}

#[tokio::test]
async fn test_buy_all_clears_basket() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;
    ctx.api.fill_basket(CUSTOMER_ID, &[1, 2]).await;
    ctx.api.clear_requests().await;

    let resp = ctx.htmx_post("/basket/buy", &[]).await;
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("You just bought all your products in the basket"));
    assert!(body.contains("Your basket is empty"));

    assert_eq!(
        ctx.api.requests().await,
        vec!["GET /baskets/1", "DELETE /baskets/1", "GET /baskets/1"]
    );
    assert!(ctx.api.basket_product_ids(CUSTOMER_ID).await.is_empty());
}

#[tokio::test]
async fn test_buy_all_failure_keeps_basket() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;
    ctx.api.fill_basket(CUSTOMER_ID, &[1]).await;
    ctx.api.fail_clear_basket(true);

    let resp = ctx.htmx_post("/basket/buy", &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Something went wrong while buying products"));
    assert!(body.contains("Classic Yellow Duck"));
}

#[tokio::test]
async fn test_guest_mutation_redirects_to_login() {
    let ctx = TestContext::start().await;

    let resp = ctx.post_form("/basket/increment", &[("product_id", "1")]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(header(&resp, "location"), "/login");

    let resp = ctx.htmx_post("/basket/add", &[("product_id", "1")]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "hx-redirect"), "/login");

    assert!(ctx.api.requests().await.is_empty());
}

#[tokio::test]
async fn test_guest_count_skips_api() {
    let ctx = TestContext::start().await;

    let body = ctx.page("/basket/count").await;
    assert!(body.contains(">0<"));
    assert!(ctx.api.requests().await.is_empty());
}
