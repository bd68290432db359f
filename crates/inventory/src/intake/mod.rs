//! Product-intake flow.
//!
//! Schema validation runs first; a form that fails never reaches the
//! network. A valid form still cannot submit without a pending image -
//! that rejection gets its own explicit notification. Submission is a
//! single platform call with no retry and no draft persistence.

pub mod schema;

use serde_json::{Map, Value};
use tracing::instrument;

use techmart_core::{EncodedImage, FieldErrors};

use crate::clients::{PlatformApiError, PlatformClient};

/// Where the UI navigates after a successful creation.
pub const PRODUCT_LIST_REDIRECT: &str = "/dashboard/products/list";

/// Result of one intake attempt.
#[derive(Debug, Clone)]
pub enum IntakeOutcome {
    /// The product was created.
    Created {
        /// Notification message.
        message: String,
        /// Navigation target.
        redirect: &'static str,
    },
    /// Schema validation blocked the submission; no network call was made.
    Rejected {
        /// Per-field messages.
        errors: FieldErrors,
    },
    /// No image has been loaded; no network call was made.
    MissingImage {
        /// Notification message.
        message: String,
    },
    /// The platform rejected the product or the call failed.
    Failed {
        /// Notification message: the server's `message` when it sent one,
        /// a generic fallback otherwise.
        message: String,
    },
}

/// Orchestrates product-intake submissions.
#[derive(Debug, Clone)]
pub struct IntakeFlow {
    platform: PlatformClient,
}

impl IntakeFlow {
    /// Create a flow over the platform client.
    #[must_use]
    pub const fn new(platform: PlatformClient) -> Self {
        Self { platform }
    }

    /// Run one intake attempt.
    #[instrument(skip_all)]
    pub async fn submit(
        &self,
        fields: &Map<String, Value>,
        pending_image: Option<EncodedImage>,
    ) -> IntakeOutcome {
        let draft = match schema::validate(fields) {
            Ok(draft) => draft,
            Err(errors) => return IntakeOutcome::Rejected { errors },
        };

        let Some(image) = pending_image else {
            return IntakeOutcome::MissingImage {
                message: "Please upload an image".to_owned(),
            };
        };

        let product = draft.with_image(image);

        match self.platform.create_product(&product).await {
            Ok(()) => IntakeOutcome::Created {
                message: "Product added successfully".to_owned(),
                redirect: PRODUCT_LIST_REDIRECT,
            },
            Err(PlatformApiError::Api {
                status,
                message: Some(message),
            }) => {
                tracing::warn!(status, %message, "platform rejected the product");
                IntakeOutcome::Failed { message }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to add product");
                IntakeOutcome::Failed {
                    message: "Failed to add product".to_owned(),
                }
            }
        }
    }
}
