//! HTTP middleware stack for the inventory console.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (hub per request)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//! 4. Request ID (add unique ID to each request)

pub mod request_id;
pub mod session;

pub use request_id::request_id_middleware;
pub use session::create_session_layer;
