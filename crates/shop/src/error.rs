//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding. Route handlers return `Result<T, AppError>`;
//! flow-level failures (validation, declined charges) are not errors, they
//! are outcomes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::clients::orders::OrdersApiError;
use crate::clients::payments::GatewayError;

/// Application-level error type for the shop.
#[derive(Debug, Error)]
pub enum AppError {
    /// Platform API operation failed.
    #[error("Platform API error: {0}")]
    Orders(#[from] OrdersApiError),

    /// Payment gateway operation failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The session already has a submission in flight.
    #[error("Submission already in progress")]
    SubmissionInFlight,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error envelope returned to the client.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Orders(_) | Self::Gateway(_) | Self::Session(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Orders(_) | Self::Gateway(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SubmissionInFlight => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Orders(_) | Self::Gateway(_) => "External service error".to_owned(),
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::SubmissionInFlight => "A submission is already in progress.".to_owned(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
