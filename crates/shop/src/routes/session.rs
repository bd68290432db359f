//! Session seeding route handlers.
//!
//! Sign-in and cart management live in other surfaces of the application;
//! the checkout service only needs their results. These endpoints let
//! those surfaces persist the authenticated user and the cart into the
//! checkout session.

use axum::Json;
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::session::{Cart, CheckoutSession, CurrentUser};

/// Acknowledgement for a session write.
#[derive(Debug, Serialize)]
pub struct SessionAck {
    /// Always true; failures surface as errors.
    pub success: bool,
}

/// Store the authenticated user in the session.
///
/// POST /session/user
#[instrument(skip(session, user), fields(user_id = %user.id))]
pub async fn store_user(
    session: CheckoutSession,
    Json(user): Json<CurrentUser>,
) -> Result<Json<SessionAck>> {
    session.store_user(&user).await?;
    Ok(Json(SessionAck { success: true }))
}

/// Store the shopping cart in the session, replacing any existing one.
///
/// POST /session/cart
#[instrument(skip(session, cart), fields(items = cart.items.len()))]
pub async fn store_cart(
    session: CheckoutSession,
    Json(cart): Json<Cart>,
) -> Result<Json<SessionAck>> {
    session.store_cart(&cart).await?;
    Ok(Json(SessionAck { success: true }))
}

/// Read the shopping cart from the session.
///
/// GET /session/cart
#[instrument(skip(session))]
pub async fn get_cart(session: CheckoutSession) -> Json<Option<Cart>> {
    Json(session.load_cart().await)
}
