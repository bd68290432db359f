//! Payment method selection.

use core::fmt;

use serde::{Deserialize, Serialize};

/// How the customer pays for an order.
///
/// Serialized in the platform API's kebab-case wire form:
/// `cash-on-delivery` / `credit-card`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Pay the courier on delivery. The default selection.
    #[default]
    CashOnDelivery,
    /// Pay by card before the order is placed.
    CreditCard,
}

impl PaymentMethod {
    /// Whether this method requires a card authorization round trip
    /// before the order can be created.
    #[must_use]
    pub const fn requires_card(self) -> bool {
        matches!(self, Self::CreditCard)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CashOnDelivery => "cash-on-delivery",
            Self::CreditCard => "credit-card",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            "\"cash-on-delivery\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"credit-card\""
        );
    }

    #[test]
    fn test_parse_wire_form() {
        let m: PaymentMethod = serde_json::from_str("\"credit-card\"").unwrap();
        assert_eq!(m, PaymentMethod::CreditCard);
    }

    #[test]
    fn test_default_is_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::CashOnDelivery);
    }

    #[test]
    fn test_requires_card() {
        assert!(!PaymentMethod::CashOnDelivery.requires_card());
        assert!(PaymentMethod::CreditCard.requires_card());
    }
}
