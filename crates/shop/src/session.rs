//! Session-backed checkout state.
//!
//! The shop keeps the authenticated user and the shopping cart in the
//! session, the way the browser app kept them in persisted local storage.
//! Flows never touch the raw session directly; they go through the typed
//! [`CheckoutSession`] accessors so tests can substitute the store behind
//! the session layer.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use techmart_core::{CartId, Email, ProductId, UserId};

/// Session keys for checkout data.
pub mod keys {
    /// Key for the authenticated user record.
    pub const AUTH_USER: &str = "auth_user";

    /// Key for the shopping cart record.
    pub const CART: &str = "cart";
}

/// Session-stored user identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    /// Platform-issued user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: Email,
}

/// A line in the shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Platform-issued product ID.
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// Quantity of this product.
    pub quantity: u32,
}

/// Session-stored shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Platform-issued cart ID, when the cart has been persisted upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CartId>,
    /// Cart lines.
    pub items: Vec<CartLine>,
    /// Cart total as recorded when the cart was stored.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl Cart {
    /// Total recomputed from the lines (unit price x quantity).
    #[must_use]
    pub fn computed_total(&self) -> Decimal {
        self.items
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum()
    }
}

/// Typed accessors over the session for checkout state.
///
/// Extractable in handlers wherever `tower_sessions::Session` is.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    session: Session,
}

impl CheckoutSession {
    /// Wrap a raw session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The underlying session ID, if the session has been persisted.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.session.id().map(|id| id.to_string())
    }

    /// Load the authenticated user, if any.
    pub async fn load_user(&self) -> Option<CurrentUser> {
        self.session
            .get::<CurrentUser>(keys::AUTH_USER)
            .await
            .ok()
            .flatten()
    }

    /// Load the shopping cart, if any.
    pub async fn load_cart(&self) -> Option<Cart> {
        self.session.get::<Cart>(keys::CART).await.ok().flatten()
    }

    /// Store the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn store_user(
        &self,
        user: &CurrentUser,
    ) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(keys::AUTH_USER, user).await
    }

    /// Store the shopping cart, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn store_cart(&self, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(keys::CART, cart).await
    }

    /// Remove the cart after a successful checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the removal.
    pub async fn clear_cart(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.remove::<Cart>(keys::CART).await.map(|_| ())
    }
}

impl<S> FromRequestParts<S> for CheckoutSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self::new(session))
    }
}
