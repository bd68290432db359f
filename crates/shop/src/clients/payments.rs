//! Card-payment gateway client.
//!
//! Confirms card charges against the gateway using the one-shot client
//! secret issued by the platform API. Card data is form-encoded (gateway
//! contract) and never logged.

use core::fmt;

use secrecy::ExposeSecret;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::checkout::forms::CardDetails;
use crate::config::PaymentGatewayConfig;

use super::orders::PaymentAuthorization;

/// Errors that can occur when calling the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("Gateway error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it was readable.
        message: String,
    },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Gateway-reported state of a payment intent after confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    /// The charge went through.
    Succeeded,
    /// The charge is still being processed.
    Processing,
    /// The customer must complete an additional challenge.
    RequiresAction,
    /// The gateway wants a different payment method.
    RequiresPaymentMethod,
    /// The intent was canceled.
    Canceled,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for PaymentIntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Succeeded => "succeeded",
            Self::Processing => "processing",
            Self::RequiresAction => "requires_action",
            Self::RequiresPaymentMethod => "requires_payment_method",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// A charge-level error reported by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeError {
    /// Human-readable message, surfaced to the customer verbatim.
    pub message: String,
    /// Gateway error code, when provided.
    #[serde(default)]
    pub code: Option<String>,
}

/// Result of a card-charge confirmation.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfirmation {
    /// Intent status after the confirmation attempt.
    pub status: PaymentIntentStatus,
    /// Charge error, when the gateway rejected the charge.
    #[serde(default)]
    pub error: Option<ChargeError>,
}

/// Client for the card-payment gateway.
#[derive(Clone)]
pub struct PaymentGatewayClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl PaymentGatewayClient {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &PaymentGatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        }
    }

    /// Confirm a card charge.
    ///
    /// The gateway answers charge-level rejections (card declined,
    /// incorrect CVC, ...) with a payment-required status and an error
    /// body; both that and 2xx bodies parse as a [`PaymentConfirmation`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the gateway responds with an
    /// unexpected status, or the response body does not parse.
    #[instrument(skip_all)]
    pub async fn confirm_card_payment(
        &self,
        authorization: &PaymentAuthorization,
        card: &CardDetails,
        billing_name: &str,
        billing_email: &str,
    ) -> Result<PaymentConfirmation, GatewayError> {
        let url = format!("{}/v1/payment_intents/confirm", self.base_url);

        let form = [
            (
                "client_secret",
                authorization.client_secret().expose_secret(),
            ),
            ("payment_method_data[type]", "card"),
            ("card[number]", card.number.as_str()),
            ("card[exp_month]", card.exp_month.as_str()),
            ("card[exp_year]", card.exp_year.as_str()),
            ("card[cvc]", card.cvc.as_str()),
            ("billing_details[name]", billing_name),
            ("billing_details[email]", billing_email),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .form(&form)
            .send()
            .await?;
        let status = response.status();

        // 402 Payment Required carries a parseable charge rejection.
        if !status.is_success() && status != reqwest::StatusCode::PAYMENT_REQUIRED {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }
}
