//! HTTP clients for external services.
//!
//! One client per external service, each with its own error type:
//! - [`orders::OrdersClient`] - the TechMart platform API (orders and
//!   payment intents)
//! - [`payments::PaymentGatewayClient`] - the card-payment gateway

pub mod orders;
pub mod payments;

pub use orders::{OrdersApiError, OrdersClient, PaymentAuthorization};
pub use payments::{GatewayError, PaymentConfirmation, PaymentGatewayClient, PaymentIntentStatus};
