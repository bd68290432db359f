//! Checkout route handlers.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::instrument;

use techmart_core::FieldErrors;

use crate::cancel;
use crate::checkout::CheckoutOutcome;
use crate::checkout::forms::CheckoutForm;
use crate::error::{AppError, Result};
use crate::session::CheckoutSession;
use crate::state::AppState;

/// Response for a checkout submission.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Whether the order was placed.
    pub success: bool,
    /// Outcome name, for observability and UI branching.
    pub status: &'static str,
    /// Notification message.
    pub message: String,
    /// Per-field validation messages, when validation rejected the form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    /// Navigation target, when the order was placed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl From<CheckoutOutcome> for CheckoutResponse {
    fn from(outcome: CheckoutOutcome) -> Self {
        match outcome {
            CheckoutOutcome::Placed { message, redirect } => Self {
                success: true,
                status: "placed",
                message,
                errors: None,
                redirect: Some(redirect),
            },
            CheckoutOutcome::Rejected { message, errors } => Self {
                success: false,
                status: "rejected",
                message,
                errors: Some(errors),
                redirect: None,
            },
            CheckoutOutcome::Declined { message } => Self {
                success: false,
                status: "declined",
                message,
                errors: None,
                redirect: None,
            },
            CheckoutOutcome::Pending { message } => Self {
                success: false,
                status: "pending",
                message,
                errors: None,
                redirect: None,
            },
            CheckoutOutcome::Cancelled => Self {
                success: false,
                status: "cancelled",
                message: "The submission was cancelled.".to_owned(),
                errors: None,
                redirect: None,
            },
            CheckoutOutcome::Failed { message } => Self {
                success: false,
                status: "failed",
                message,
                errors: None,
                redirect: None,
            },
        }
    }
}

/// Submit the checkout form.
///
/// POST /checkout
///
/// Runs the submission as a spawned task under a cancellation token: if
/// the client disconnects mid-flight, the in-flight platform calls finish
/// but their side effects are not applied. The duplicate-submission permit
/// is held for the whole attempt and released on every exit path.
#[instrument(skip(state, session, form), fields(payment_method = %form.payment_method))]
pub async fn submit(
    State(state): State<AppState>,
    session: CheckoutSession,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<CheckoutResponse>> {
    let _permit = match session.id() {
        Some(key) => Some(
            state
                .gate()
                .try_acquire(&key)
                .ok_or(AppError::SubmissionInFlight)?,
        ),
        // A session that has never been persisted has nothing to guard.
        None => None,
    };

    let (handle, token) = cancel::pair();
    let flow = state.flow().clone();
    let task_session = session.clone();

    let task = tokio::spawn(async move { flow.submit(form, task_session, token).await });
    let outcome = task
        .await
        .map_err(|e| AppError::Internal(format!("checkout task failed: {e}")))?;
    handle.disarm();

    Ok(Json(CheckoutResponse::from(outcome)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_placed_outcome_maps_to_success() {
        let response = CheckoutResponse::from(CheckoutOutcome::Placed {
            message: "Order placed successfully".to_owned(),
            redirect: "/user/profile",
        });
        assert!(response.success);
        assert_eq!(response.status, "placed");
        assert_eq!(response.redirect, Some("/user/profile"));
    }

    #[test]
    fn test_rejected_outcome_carries_field_errors() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "Name is required");
        let response = CheckoutResponse::from(CheckoutOutcome::Rejected {
            message: "Please correct the errors in the form.".to_owned(),
            errors,
        });
        assert!(!response.success);
        assert_eq!(response.status, "rejected");
        assert_eq!(
            response.errors.unwrap().get("name"),
            Some("Name is required")
        );
    }

    #[test]
    fn test_declined_message_is_verbatim() {
        let response = CheckoutResponse::from(CheckoutOutcome::Declined {
            message: "Your card was declined.".to_owned(),
        });
        assert_eq!(response.message, "Your card was declined.");
        assert_eq!(response.status, "declined");
    }
}
