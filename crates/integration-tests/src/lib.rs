//! Integration test harness for the Ducktastic storefront.
//!
//! [`FakeApi`] stands in for the Ducktastic REST API: customers, products
//! and baskets live in memory, and every request is recorded so tests can
//! assert on the exact calls the storefront made. [`TestContext`] runs the
//! real storefront router against it, both on ephemeral ports, and drives
//! it with a cookie-keeping HTTP client that does not follow redirects.
//!
//! Run with: cargo test -p ducktastic-integration-tests

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use ducktastic_storefront::api::DucktasticClient;
use ducktastic_storefront::config::StorefrontConfig;
use ducktastic_storefront::content::ContentStore;
use ducktastic_storefront::state::AppState;

/// Seeded customer with a basket of their own.
pub const CUSTOMER_ID: i32 = 1;
pub const CUSTOMER_EMAIL: &str = "anders@ducktastic.dk";
pub const CUSTOMER_PASSWORD: &str = "quack1234";

// =============================================================================
// Fake Ducktastic API
// =============================================================================

/// In-memory Ducktastic API.
#[derive(Clone)]
pub struct FakeApi {
    inner: Arc<FakeApiInner>,
}

struct FakeApiInner {
    customers: RwLock<Vec<Value>>,
    products: Vec<Value>,
    baskets: RwLock<HashMap<i32, Vec<Value>>>,
    requests: RwLock<Vec<String>>,
    fail_guest: AtomicBool,
    fail_clear: AtomicBool,
}

impl FakeApi {
    /// A guest, one customer, and three ducks in two categories.
    #[must_use]
    pub fn seeded() -> Self {
        let customers = vec![
            json!({"customerId": 0, "firstName": "Guest", "basketId": 0}),
            json!({
                "customerId": CUSTOMER_ID,
                "firstName": "Anders",
                "lastName": "And",
                "email": CUSTOMER_EMAIL,
                "password": CUSTOMER_PASSWORD,
                "basketId": CUSTOMER_ID,
            }),
        ];
        let products = vec![
            json!({
                "productId": 1,
                "productName": "Classic Yellow Duck",
                "productPrice": 50,
                "productDescription": "The one from the bathtub.",
                "imgSrc": "classic.png",
                "category": "Classic",
            }),
            json!({
                "productId": 2,
                "productName": "Pirate Duck",
                "productPrice": 80,
                "productDescription": "Eye patch included.",
                "imgSrc": "pirate.png",
                "category": "Costume",
            }),
            json!({
                "productId": 3,
                "productName": "Viking Duck",
                "productPrice": 90,
                "imgSrc": "viking.png",
                "category": "Costume",
            }),
        ];

        Self {
            inner: Arc::new(FakeApiInner {
                customers: RwLock::new(customers),
                products,
                baskets: RwLock::new(HashMap::new()),
                requests: RwLock::new(Vec::new()),
                fail_guest: AtomicBool::new(false),
                fail_clear: AtomicBool::new(false),
            }),
        }
    }

    /// Router serving the API's endpoints.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/customers", get(list_customers).post(create_customer))
            .route("/customers/guest", get(guest_customer))
            .route("/products", get(list_products))
            .route("/products/{id}", get(product))
            .route(
                "/baskets/{customer_id}",
                get(basket).delete(clear_basket),
            )
            .route(
                "/baskets/{customer_id}/{product_id}",
                put(add_item).delete(remove_item),
            )
            .layer(middleware::from_fn_with_state(self.clone(), record))
            .with_state(self.clone())
    }

    /// Every request seen so far, as `"METHOD /path"`.
    pub async fn requests(&self) -> Vec<String> {
        self.inner.requests.read().await.clone()
    }

    /// Forget recorded requests.
    pub async fn clear_requests(&self) {
        self.inner.requests.write().await.clear();
    }

    /// Make `GET /customers/guest` answer 500.
    pub fn fail_guest_lookup(&self, fail: bool) {
        self.inner.fail_guest.store(fail, Ordering::SeqCst);
    }

    /// Make `DELETE /baskets/{id}` answer 500.
    pub fn fail_clear_basket(&self, fail: bool) {
        self.inner.fail_clear.store(fail, Ordering::SeqCst);
    }

    /// Product IDs in a customer's basket, one entry per unit.
    pub async fn basket_product_ids(&self, customer_id: i32) -> Vec<i32> {
        self.inner
            .baskets
            .read()
            .await
            .get(&customer_id)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item["productId"].as_i64())
                    .filter_map(|id| i32::try_from(id).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Put products straight into a basket, bypassing the storefront.
    pub async fn fill_basket(&self, customer_id: i32, product_ids: &[i32]) {
        let items: Vec<Value> = product_ids
            .iter()
            .filter_map(|id| self.find_product(*id))
            .map(|product| line_item(&product))
            .collect();
        self.inner
            .baskets
            .write()
            .await
            .entry(customer_id)
            .or_default()
            .extend(items);
    }

    fn find_product(&self, product_id: i32) -> Option<Value> {
        self.inner
            .products
            .iter()
            .find(|p| p["productId"] == product_id)
            .cloned()
    }
}

fn line_item(product: &Value) -> Value {
    json!({
        "productId": product["productId"],
        "productName": product["productName"],
        "productPrice": product["productPrice"],
        "imgSrc": product["imgSrc"],
    })
}

async fn record(State(api): State<FakeApi>, request: Request, next: Next) -> Response {
    api.inner
        .requests
        .write()
        .await
        .push(format!("{} {}", request.method(), request.uri().path()));
    next.run(request).await
}

async fn list_customers(State(api): State<FakeApi>) -> Json<Vec<Value>> {
    Json(api.inner.customers.read().await.clone())
}

async fn create_customer(State(api): State<FakeApi>, Json(mut body): Json<Value>) -> StatusCode {
    let mut customers = api.inner.customers.write().await;
    let next_id = customers
        .iter()
        .filter_map(|c| c["customerId"].as_i64())
        .max()
        .unwrap_or(0)
        + 1;
    body["customerId"] = json!(next_id);
    body["basketId"] = json!(next_id);
    customers.push(body);
    StatusCode::CREATED
}

async fn guest_customer(State(api): State<FakeApi>) -> Response {
    if api.inner.fail_guest.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let customers = api.inner.customers.read().await;
    customers
        .iter()
        .find(|c| c["customerId"] == 0)
        .cloned()
        .map_or_else(
            || StatusCode::NOT_FOUND.into_response(),
            |guest| Json(guest).into_response(),
        )
}

async fn list_products(State(api): State<FakeApi>) -> Json<Vec<Value>> {
    Json(api.inner.products.clone())
}

async fn product(State(api): State<FakeApi>, Path(id): Path<i32>) -> Response {
    api.find_product(id).map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |product| Json(product).into_response(),
    )
}

async fn basket(State(api): State<FakeApi>, Path(customer_id): Path<i32>) -> Json<Vec<Value>> {
    Json(
        api.inner
            .baskets
            .read()
            .await
            .get(&customer_id)
            .cloned()
            .unwrap_or_default(),
    )
}

async fn add_item(
    State(api): State<FakeApi>,
    Path((customer_id, product_id)): Path<(i32, i32)>,
) -> StatusCode {
    let Some(product) = api.find_product(product_id) else {
        return StatusCode::NOT_FOUND;
    };
    api.inner
        .baskets
        .write()
        .await
        .entry(customer_id)
        .or_default()
        .push(line_item(&product));
    StatusCode::OK
}

async fn remove_item(
    State(api): State<FakeApi>,
    Path((customer_id, product_id)): Path<(i32, i32)>,
) -> StatusCode {
    let mut baskets = api.inner.baskets.write().await;
    let items = baskets.entry(customer_id).or_default();
    match items.iter().position(|item| item["productId"] == product_id) {
        Some(index) => {
            items.remove(index);
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn clear_basket(State(api): State<FakeApi>, Path(customer_id): Path<i32>) -> StatusCode {
    if api.inner.fail_clear.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    api.inner.baskets.write().await.remove(&customer_id);
    StatusCode::OK
}

// =============================================================================
// Test Context
// =============================================================================

/// A running storefront wired to a [`FakeApi`].
pub struct TestContext {
    pub api: FakeApi,
    pub client: reqwest::Client,
    base_url: String,
}

impl TestContext {
    /// Start the fake API and the storefront.
    pub async fn start() -> Self {
        let api = FakeApi::seeded();
        let api_addr = serve(api.router()).await;

        let storefront_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront");
        let api_url = format!("http://{api_addr}");
        let content_dir = storefront_dir.join("content").to_string_lossy().into_owned();

        let config = StorefrontConfig::from_source(|key| match key {
            "DUCKTASTIC_API_URL" => Some(api_url.clone()),
            "DUCKTASTIC_CONTENT_DIR" => Some(content_dir.clone()),
            _ => None,
        })
        .expect("Failed to build storefront config");
        let client = DucktasticClient::new(&config.api).expect("Failed to build API client");
        let content = ContentStore::load(&config.content_dir).expect("Failed to load content");

        let state = AppState::new(config, client, content);
        let app = ducktastic_storefront::app(state, &storefront_dir.join("static"));
        let addr = serve(app).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api,
            client,
            base_url: format!("http://{addr}"),
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// GET and return the body, asserting a 200.
    pub async fn page(&self, path: &str) -> String {
        let resp = self.get(path).await;
        assert_eq!(resp.status(), reqwest::StatusCode::OK, "GET {path}");
        resp.text().await.expect("Failed to read body")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// POST the way HTMX does, with `HX-Request: true`.
    pub async fn htmx_post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("HTMX request failed")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    /// Log in as the seeded customer.
    pub async fn login_as_customer(&self) {
        let resp = self.login(CUSTOMER_EMAIL, CUSTOMER_PASSWORD).await;
        assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER);
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move { axum::serve(listener, app).await });
    addr
}
