//! Application state shared across handlers.

use std::sync::Arc;

use crate::clients::PlatformClient;
use crate::config::InventoryConfig;
use crate::fuel::FuelFlow;
use crate::intake::IntakeFlow;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the configuration and
/// the intake and fuel flows.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: InventoryConfig,
    intake: IntakeFlow,
    fuel: FuelFlow,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: InventoryConfig) -> Self {
        let platform = PlatformClient::new(&config.platform_api_url);
        let intake = IntakeFlow::new(platform.clone());
        let fuel = FuelFlow::new(platform);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                intake,
                fuel,
            }),
        }
    }

    /// Get a reference to the console configuration.
    #[must_use]
    pub fn config(&self) -> &InventoryConfig {
        &self.inner.config
    }

    /// Get a reference to the product-intake flow.
    #[must_use]
    pub fn intake(&self) -> &IntakeFlow {
        &self.inner.intake
    }

    /// Get a reference to the fuel-request flow.
    #[must_use]
    pub fn fuel(&self) -> &FuelFlow {
        &self.inner.fuel
    }
}
