//! Fuel-request route handlers.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::instrument;

use techmart_core::FieldErrors;

use crate::error::Result;
use crate::fuel::{FuelForm, FuelOutcome};
use crate::state::AppState;

/// Response for a fuel-request submission.
#[derive(Debug, Serialize)]
pub struct FuelResponse {
    /// Whether the request was recorded.
    pub success: bool,
    /// Outcome name.
    pub status: &'static str,
    /// Notification message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Per-field validation messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl From<FuelOutcome> for FuelResponse {
    fn from(outcome: FuelOutcome) -> Self {
        match outcome {
            FuelOutcome::Submitted { message } => Self {
                success: true,
                status: "submitted",
                message: Some(message),
                errors: None,
            },
            FuelOutcome::Rejected { errors } => Self {
                success: false,
                status: "rejected",
                message: None,
                errors: Some(errors),
            },
            FuelOutcome::Failed { message } => Self {
                success: false,
                status: "failed",
                message: Some(message),
                errors: None,
            },
        }
    }
}

/// Submit a fuel request.
///
/// POST /fuel-requests
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<FuelForm>,
) -> Result<Json<FuelResponse>> {
    let outcome = state.fuel().submit(&form).await;
    Ok(Json(FuelResponse::from(outcome)))
}
