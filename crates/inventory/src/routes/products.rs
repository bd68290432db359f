//! Product-intake route handlers.
//!
//! The intake form holds at most one pending image. Uploading reads the
//! file, encodes it as a base64 data URL, and replaces any prior pending
//! image in the session; submission requires one to be present.

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use serde_json::{Map, Value};
use tower_sessions::Session;
use tracing::instrument;

use techmart_core::{EncodedImage, FieldErrors};

use crate::error::{AppError, Result};
use crate::intake::IntakeOutcome;
use crate::state::AppState;

/// Session keys for intake data.
pub mod session_keys {
    /// Key for the pending product image.
    pub const PENDING_IMAGE: &str = "pending_product_image";
}

/// Get the pending image from the session.
async fn get_pending_image(session: &Session) -> Option<EncodedImage> {
    session
        .get::<EncodedImage>(session_keys::PENDING_IMAGE)
        .await
        .ok()
        .flatten()
}

/// Set the pending image in the session, replacing any prior one.
async fn set_pending_image(
    session: &Session,
    image: &EncodedImage,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::PENDING_IMAGE, image).await
}

/// Clear the pending image after a successful submission.
async fn clear_pending_image(
    session: &Session,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session
        .remove::<EncodedImage>(session_keys::PENDING_IMAGE)
        .await
        .map(|_| ())
}

/// Response for an image upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Whether the image was stored.
    pub success: bool,
    /// The data URL the UI renders as a preview.
    pub preview: String,
}

/// Response for a product submission.
#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    /// Whether the product was created.
    pub success: bool,
    /// Outcome name, for observability and UI branching.
    pub status: &'static str,
    /// Notification message, absent on plain validation rejections
    /// (those render inline, per field).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Per-field validation messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    /// Navigation target, when the product was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl From<IntakeOutcome> for IntakeResponse {
    fn from(outcome: IntakeOutcome) -> Self {
        match outcome {
            IntakeOutcome::Created { message, redirect } => Self {
                success: true,
                status: "created",
                message: Some(message),
                errors: None,
                redirect: Some(redirect),
            },
            IntakeOutcome::Rejected { errors } => Self {
                success: false,
                status: "rejected",
                message: None,
                errors: Some(errors),
                redirect: None,
            },
            IntakeOutcome::MissingImage { message } => Self {
                success: false,
                status: "missing_image",
                message: Some(message),
                errors: None,
                redirect: None,
            },
            IntakeOutcome::Failed { message } => Self {
                success: false,
                status: "failed",
                message: Some(message),
                errors: None,
                redirect: None,
            },
        }
    }
}

/// Upload the product image.
///
/// POST /products/image (multipart)
///
/// Reads the first file field, stores its encoded form in the session,
/// and echoes the data URL for the preview.
#[instrument(skip_all)]
pub async fn upload_image(
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid upload: {e}")))?
        .ok_or_else(|| AppError::BadRequest("no file in upload".to_owned()))?;

    let media_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_owned();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid upload: {e}")))?;

    let image = EncodedImage::from_bytes(&media_type, &bytes)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    set_pending_image(&session, &image).await?;
    tracing::info!(media_type = %image.media_type(), bytes = image.decoded_len(), "pending image replaced");

    Ok(Json(UploadResponse {
        success: true,
        preview: image.as_data_url(),
    }))
}

/// Submit the product form.
///
/// POST /products
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<IntakeResponse>> {
    let pending_image = get_pending_image(&session).await;

    let outcome = state.intake().submit(&fields, pending_image).await;

    if matches!(outcome, IntakeOutcome::Created { .. }) {
        clear_pending_image(&session).await?;
    }

    Ok(Json(IntakeResponse::from(outcome)))
}
