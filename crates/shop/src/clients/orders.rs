//! Platform API client for order creation and payment intents.
//!
//! The platform API is the source of truth for orders; the shop never
//! stores them locally. Calls are plain JSON POSTs.

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::checkout::CheckoutRequest;

/// Errors that can occur when calling the platform API.
#[derive(Debug, Error)]
pub enum OrdersApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
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

/// A one-shot payment authorization issued by the platform API.
///
/// Holds the gateway client secret; used once to confirm the charge and
/// never persisted.
pub struct PaymentAuthorization {
    client_secret: SecretString,
}

impl PaymentAuthorization {
    /// The gateway client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }
}

impl std::fmt::Debug for PaymentAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentAuthorization")
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Body for `POST /orders/create-payment-intent`.
///
/// The amount is the order total pre-divided by the platform's fixed
/// currency-conversion divisor; see [`crate::checkout::charge_amount`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentIntentRequest {
    #[serde(with = "rust_decimal::serde::float")]
    total_price: Decimal,
}

/// Response from `POST /orders/create-payment-intent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentIntentResponse {
    client_secret: String,
}

/// Client for the TechMart platform API.
#[derive(Debug, Clone)]
pub struct OrdersClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrdersClient {
    /// Create a new platform API client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Create an order from a checkout request.
    ///
    /// Any 2xx status is success; the response body is not consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API responds with a
    /// non-success status.
    #[instrument(skip(self, order), fields(payment_method = %order.payment_method))]
    pub async fn create_order(&self, order: &CheckoutRequest) -> Result<(), OrdersApiError> {
        let url = format!("{}/orders", self.base_url);

        let response = self.client.post(&url).json(order).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OrdersApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Request a payment authorization for a card charge.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API responds with a
    /// non-success status, or the response lacks a client secret.
    #[instrument(skip(self))]
    pub async fn create_payment_intent(
        &self,
        amount: Decimal,
    ) -> Result<PaymentAuthorization, OrdersApiError> {
        let url = format!("{}/orders/create-payment-intent", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&PaymentIntentRequest {
                total_price: amount,
            })
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OrdersApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: PaymentIntentResponse = response
            .json()
            .await
            .map_err(|e| OrdersApiError::Parse(e.to_string()))?;

        Ok(PaymentAuthorization {
            client_secret: SecretString::from(body.client_secret),
        })
    }
}
