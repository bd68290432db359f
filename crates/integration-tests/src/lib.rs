//! Integration tests for TechMart client services.
//!
//! Each test spins up a stub platform API (and, for card flows, a stub
//! payment gateway) plus the service under test, all on loopback port 0,
//! and drives the service over HTTP with a cookie-holding client. The
//! stubs record every request they receive, so tests can assert exactly
//! which upstream calls a flow made - including that a rejected flow made
//! none.
//!
//! # Test Categories
//!
//! - `checkout` - Checkout flow (cash, card, validation, cancellation)
//! - `product_intake` - Product-intake flow (image, schema, error bodies)
//! - `fuel` - Fuel-request flow (distance rules, derived cost)

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Json;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use secrecy::SecretString;
use serde_json::{Value, json};

use techmart_inventory::config::InventoryConfig;
use techmart_shop::config::{PaymentGatewayConfig, ShopConfig};

/// A request recorded by a stub server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// JSON body, or `Value::String` for non-JSON bodies, or `Null`.
    pub body: Value,
}

/// Stub of the TechMart platform API.
///
/// Records every request and answers with scripted responses.
#[derive(Clone)]
pub struct StubPlatform {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    order_status: Arc<Mutex<u16>>,
    order_delay: Arc<Mutex<Duration>>,
    product_response: Arc<Mutex<(u16, Option<Value>)>>,
    client_secret: String,
}

impl Default for StubPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl StubPlatform {
    /// Create a stub that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            order_status: Arc::new(Mutex::new(201)),
            order_delay: Arc::new(Mutex::new(Duration::ZERO)),
            product_response: Arc::new(Mutex::new((201, None))),
            client_secret: "pi_stub_secret_0001".to_owned(),
        }
    }

    /// Script the status returned by `POST /orders`.
    pub fn set_order_status(&self, status: u16) {
        *lock(&self.order_status) = status;
    }

    /// Delay `POST /orders` responses, for overlap and abort tests.
    pub fn set_order_delay(&self, delay: Duration) {
        *lock(&self.order_delay) = delay;
    }

    /// Script the response of `POST /products`.
    pub fn set_product_response(&self, status: u16, body: Option<Value>) {
        *lock(&self.product_response) = (status, body);
    }

    /// All recorded requests, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests recorded for a path.
    #[must_use]
    pub fn calls_to(&self, path: &str) -> usize {
        lock(&self.requests).iter().filter(|r| r.path == path).count()
    }

    /// The body of the last request to a path.
    #[must_use]
    pub fn last_body(&self, path: &str) -> Option<Value> {
        lock(&self.requests)
            .iter()
            .rev()
            .find(|r| r.path == path)
            .map(|r| r.body.clone())
    }

    /// Start the stub, returning its base URL.
    pub async fn spawn(&self) -> String {
        let stub = self.clone();
        let router = Router::new().fallback(move |req: Request| {
            let stub = stub.clone();
            async move { stub.handle(req).await }
        });
        spawn_router(router).await
    }

    async fn handle(&self, req: Request) -> Response {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_owned();
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap_or_default();
        let body = parse_body(&bytes);

        lock(&self.requests).push(RecordedRequest {
            method: parts.method.to_string(),
            path: path.clone(),
            body,
        });

        match path.as_str() {
            "/orders/create-payment-intent" => (
                StatusCode::OK,
                Json(json!({ "clientSecret": self.client_secret })),
            )
                .into_response(),
            "/orders" => {
                let delay = *lock(&self.order_delay);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                status_response(*lock(&self.order_status))
            }
            "/products" => {
                let (status, body) = lock(&self.product_response).clone();
                match body {
                    Some(body) => (status_code(status), Json(body)).into_response(),
                    None => status_response(status),
                }
            }
            "/fuel-rqst" => StatusCode::CREATED.into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// Stub of the card-payment gateway.
#[derive(Clone)]
pub struct StubGateway {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    response: Arc<Mutex<(u16, Value)>>,
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl StubGateway {
    /// Create a stub that confirms every charge.
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            response: Arc::new(Mutex::new((200, json!({ "status": "succeeded" })))),
        }
    }

    /// Script a successful confirmation.
    pub fn respond_succeeded(&self) {
        *lock(&self.response) = (200, json!({ "status": "succeeded" }));
    }

    /// Script a charge rejection with the given message.
    pub fn respond_error(&self, message: &str) {
        *lock(&self.response) = (
            402,
            json!({
                "status": "requires_payment_method",
                "error": { "message": message, "code": "card_declined" },
            }),
        );
    }

    /// Script a confirmation that ends in the given non-final status.
    pub fn respond_status(&self, status: &str) {
        *lock(&self.response) = (200, json!({ "status": status }));
    }

    /// Number of confirmation requests received.
    #[must_use]
    pub fn confirmations(&self) -> usize {
        lock(&self.requests).len()
    }

    /// The form body of the last confirmation request.
    #[must_use]
    pub fn last_form(&self) -> Option<String> {
        lock(&self.requests).last().map(|r| match &r.body {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Start the stub, returning its base URL.
    pub async fn spawn(&self) -> String {
        let stub = self.clone();
        let router = Router::new().fallback(move |req: Request| {
            let stub = stub.clone();
            async move { stub.handle(req).await }
        });
        spawn_router(router).await
    }

    async fn handle(&self, req: Request) -> Response {
        let (parts, body) = req.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap_or_default();

        lock(&self.requests).push(RecordedRequest {
            method: parts.method.to_string(),
            path: parts.uri.path().to_owned(),
            body: Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        });

        let (status, body) = lock(&self.response).clone();
        (status_code(status), Json(body)).into_response()
    }
}

/// Start the shop service against the given upstreams; returns its base URL.
pub async fn spawn_shop(platform_url: &str, gateway_url: &str) -> String {
    let config = ShopConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost:3000".to_owned(),
        platform_api_url: platform_url.to_owned(),
        gateway: PaymentGatewayConfig {
            api_url: gateway_url.to_owned(),
            api_key: SecretString::from("gk_test_9f8a7b6c5d4e3f2a1b0c".to_owned()),
        },
        sentry_dsn: None,
        sentry_environment: None,
    };

    let state = techmart_shop::state::AppState::new(config);
    spawn_router(techmart_shop::routes::router(state)).await
}

/// Start the inventory console against the given platform; returns its base URL.
pub async fn spawn_inventory(platform_url: &str) -> String {
    let config = InventoryConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost:3001".to_owned(),
        platform_api_url: platform_url.to_owned(),
        sentry_dsn: None,
        sentry_environment: None,
    };

    let state = techmart_inventory::state::AppState::new(config);
    spawn_router(techmart_inventory::routes::router(state)).await
}

/// A client that holds session cookies across requests.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build test client")
}

/// Serve a router on a loopback port; returns its base URL.
pub async fn spawn_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{addr}")
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn status_response(status: u16) -> Response {
    status_code(status).into_response()
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
