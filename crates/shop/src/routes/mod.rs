//! HTTP routes for the shop service.

pub mod checkout;
pub mod session;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::middleware;
use crate::state::AppState;

/// Build the shop router with its middleware stack.
#[must_use]
pub fn router(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/checkout", post(checkout::submit))
        .route("/session/user", post(session::store_user))
        .route("/session/cart", post(session::store_cart).get(session::get_cart))
        .route("/refetch", get(refetch_version))
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

/// Current refetch version.
#[derive(Debug, Serialize)]
struct RefetchVersion {
    version: u64,
}

/// Report the refetch version; dependent views compare it against the
/// version they rendered at.
///
/// GET /refetch
async fn refetch_version(State(state): State<AppState>) -> Json<RefetchVersion> {
    Json(RefetchVersion {
        version: state.refetch().version(),
    })
}
