//! HTTP clients for external services.

pub mod platform;

pub use platform::{PlatformApiError, PlatformClient};
