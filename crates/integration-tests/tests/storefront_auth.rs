//! Login, logout, and signup against the fake Ducktastic API.
//!
//! Run with: cargo test -p ducktastic-integration-tests

use ducktastic_integration_tests::{CUSTOMER_EMAIL, CUSTOMER_PASSWORD, TestContext};
use reqwest::StatusCode;

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_visitor_starts_as_guest() {
    let ctx = TestContext::start().await;
    let body = ctx.page("/").await;
    assert!(body.contains("Hi, Guest"));
    assert!(body.contains("href=\"/login\""));
}

#[tokio::test]
async fn test_login_success_redirects_home() {
    let ctx = TestContext::start().await;

    let resp = ctx.login(CUSTOMER_EMAIL, CUSTOMER_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let body = ctx.page("/").await;
    assert!(body.contains("Hi, Anders"));
}

#[tokio::test]
async fn test_login_failure_keeps_guest() {
    let ctx = TestContext::start().await;

    let resp = ctx.login(CUSTOMER_EMAIL, "wrong-password").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("email and password does not exist"));
    // The email is kept in the form
    assert!(body.contains(CUSTOMER_EMAIL));

    let body = ctx.page("/").await;
    assert!(body.contains("Hi, Guest"));
}

#[tokio::test]
async fn test_login_requires_exact_email() {
    let ctx = TestContext::start().await;

    let padded = format!("  {CUSTOMER_EMAIL} ");
    let resp = ctx.login(&padded, CUSTOMER_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = ctx.login("ANDERS@ducktastic.dk", CUSTOMER_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = ctx.page("/").await;
    assert!(body.contains("Hi, Guest"));
}

#[tokio::test]
async fn test_failed_login_does_not_log_out() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;

    let resp = ctx.login("nobody@ducktastic.dk", CUSTOMER_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = ctx.page("/").await;
    assert!(body.contains("Hi, Anders"));
}

#[tokio::test]
async fn test_logout_resets_to_guest() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;

    let resp = ctx.post_form("/logout", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(ctx.api.requests().await.contains(&"GET /customers/guest".to_string()));

    let body = ctx.page("/").await;
    assert!(body.contains("Hi, Guest"));

    // The guest's basket is customer 0's
    ctx.api.clear_requests().await;
    let body = ctx.page("/basket").await;
    assert!(body.contains("Your basket is empty"));
    assert_eq!(ctx.api.requests().await, vec!["GET /baskets/0"]);
}

#[tokio::test]
async fn test_logout_keeps_session_when_guest_lookup_fails() {
    let ctx = TestContext::start().await;
    ctx.login_as_customer().await;
    ctx.api.fail_guest_lookup(true);

    let resp = ctx.post_form("/logout", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let body = ctx.page("/").await;
    assert!(body.contains("Hi, Anders"));
}

#[tokio::test]
async fn test_signup_creates_customer_and_logs_in() {
    let ctx = TestContext::start().await;

    let resp = ctx
        .post_form(
            "/signup",
            &[
                ("first_name", "Rip"),
                ("last_name", "And"),
                ("email", "rip@ducktastic.dk"),
                ("password", "rap-rup-1"),
                ("password_confirm", "rap-rup-1"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(ctx.api.requests().await.contains(&"POST /customers".to_string()));

    let body = ctx.page("/").await;
    assert!(body.contains("Hi, Rip"));

    // The new account can log in again later
    ctx.post_form("/logout", &[]).await;
    let resp = ctx.login("rip@ducktastic.dk", "rap-rup-1").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_signup_rejects_taken_email() {
    let ctx = TestContext::start().await;

    let resp = ctx
        .post_form(
            "/signup",
            &[
                ("first_name", "Anders"),
                ("last_name", "And"),
                ("email", "Anders@Ducktastic.dk"),
                ("password", "rap-rup-1"),
                ("password_confirm", "rap-rup-1"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("an account with this email already exists"));
    assert!(!ctx.api.requests().await.contains(&"POST /customers".to_string()));
}

#[tokio::test]
async fn test_signup_rejects_mismatched_passwords() {
    let ctx = TestContext::start().await;

    let resp = ctx
        .post_form(
            "/signup",
            &[
                ("first_name", "Rip"),
                ("last_name", "And"),
                ("email", "rip@ducktastic.dk"),
                ("password", "rap-rup-1"),
                ("password_confirm", "rap-rup-2"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(ctx.api.requests().await.is_empty());
}
