//! Application state shared across handlers.

use std::sync::Arc;

use crate::checkout::CheckoutFlow;
use crate::checkout::gate::SubmitGate;
use crate::clients::{OrdersClient, PaymentGatewayClient};
use crate::config::ShopConfig;
use crate::refetch::RefetchHub;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the configuration, the
/// checkout flow, the refetch hub, and the duplicate-submission gate.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopConfig,
    flow: CheckoutFlow,
    refetch: RefetchHub,
    gate: SubmitGate,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: ShopConfig) -> Self {
        let refetch = RefetchHub::new();
        let orders = OrdersClient::new(&config.platform_api_url);
        let gateway = PaymentGatewayClient::new(&config.gateway);
        let flow = CheckoutFlow::new(orders, gateway, refetch.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                flow,
                refetch,
                gate: SubmitGate::new(),
            }),
        }
    }

    /// Get a reference to the shop configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.inner.config
    }

    /// Get a reference to the checkout flow.
    #[must_use]
    pub fn flow(&self) -> &CheckoutFlow {
        &self.inner.flow
    }

    /// Get a reference to the refetch hub.
    #[must_use]
    pub fn refetch(&self) -> &RefetchHub {
        &self.inner.refetch
    }

    /// Get a reference to the duplicate-submission gate.
    #[must_use]
    pub fn gate(&self) -> &SubmitGate {
        &self.inner.gate
    }
}
