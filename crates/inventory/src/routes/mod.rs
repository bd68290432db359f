//! HTTP routes for the inventory console.

pub mod fuel;
pub mod products;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::middleware;
use crate::state::AppState;

/// Build the console router with its middleware stack.
#[must_use]
pub fn router(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/products/image", post(products::upload_image))
        .route("/products", post(products::create))
        .route("/fuel-requests", post(fuel::create))
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(sentry_tower::NewSentryLayer::<axum::extract::Request>::new_from_top())
        .with_state(state)
}

/// Liveness probe.
async fn health() -> &'static str {
    "OK"
}
