//! Platform API client for product creation and fuel requests.
//!
//! The platform API stores products and fuel requests; the console keeps
//! nothing locally. Error responses carry a human-readable `message`
//! field, but not reliably - the parse is guarded and absence surfaces as
//! `None`.

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::fuel::FuelRequest;
use crate::intake::schema::Product;

/// Errors that can occur when calling the platform API.
#[derive(Debug, Error)]
pub enum PlatformApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status}{}", .message.as_deref().map(|m| format!(" - {m}")).unwrap_or_default())]
    Api {
        /// HTTP status code.
        status: u16,
        /// The error body's `message` field, when the body carried one.
        message: Option<String>,
    },
}

/// Error body shape the platform API uses for rejections.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the TechMart platform API.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    client: reqwest::Client,
    base_url: String,
}

impl PlatformClient {
    /// Create a new platform API client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Create a product.
    ///
    /// The platform signals creation with HTTP 201; anything else is a
    /// rejection, with the error body's `message` extracted when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API responds with a
    /// status other than 201.
    #[instrument(skip(self, product), fields(product_name = %product.product_name))]
    pub async fn create_product(&self, product: &Product) -> Result<(), PlatformApiError> {
        let url = format!("{}/products", self.base_url);

        let response = self.client.post(&url).json(product).send().await?;
        let status = response.status();

        if status != reqwest::StatusCode::CREATED {
            let message = parse_error_message(&response.text().await.unwrap_or_default());
            return Err(PlatformApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Create a fuel request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API responds with a
    /// non-success status.
    #[instrument(skip(self, request), fields(distance = %request.distance))]
    pub async fn create_fuel_request(&self, request: &FuelRequest) -> Result<(), PlatformApiError> {
        let url = format!("{}/fuel-rqst", self.base_url);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = parse_error_message(&response.text().await.unwrap_or_default());
            return Err(PlatformApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Extract the `message` field from an error body, if it has one.
fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.message)
}
