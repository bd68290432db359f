//! Checkout form data and validation.
//!
//! Validation is a pure function of the submitted field values. It never
//! touches the network; a non-empty error map blocks submission outright.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use techmart_core::{Email, EmailError, FieldErrors, PaymentMethod, Phone, PhoneError};

/// Raw checkout form as submitted by the UI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    /// Recipient name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Delivery city.
    pub city: String,
    /// Contact phone number.
    pub phone: String,
    /// Delivery address.
    pub address: String,
    /// Selected payment method.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Order total as shown to the customer.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    /// Card data, present when paying by card.
    #[serde(default)]
    pub card: Option<CardDetails>,
}

/// Inline card input data.
///
/// Redacted from `Debug` output; card data must never reach logs.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    /// Primary account number.
    pub number: String,
    /// Expiry month (1-12).
    pub exp_month: String,
    /// Expiry year.
    pub exp_year: String,
    /// Card verification code.
    pub cvc: String,
}

impl CardDetails {
    /// Whether the card input reports complete, non-empty card data.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let number_ok = (12..=19).contains(&self.number.len())
            && self.number.chars().all(|c| c.is_ascii_digit());
        let month_ok = self
            .exp_month
            .parse::<u8>()
            .is_ok_and(|m| (1..=12).contains(&m));
        let year_ok = matches!(self.exp_year.len(), 2 | 4)
            && self.exp_year.chars().all(|c| c.is_ascii_digit());
        let cvc_ok = matches!(self.cvc.len(), 3 | 4) && self.cvc.chars().all(|c| c.is_ascii_digit());

        number_ok && month_ok && year_ok && cvc_ok
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &"[REDACTED]")
            .field("exp_month", &"[REDACTED]")
            .field("exp_year", &"[REDACTED]")
            .field("cvc", &"[REDACTED]")
            .finish()
    }
}

/// Validated shipping details, serialized to the platform wire form.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingAddress {
    /// Recipient name.
    pub name: String,
    /// Contact email.
    pub email: Email,
    /// Delivery city.
    pub city: String,
    /// Contact phone number.
    pub phone: Phone,
    /// Delivery address.
    pub address: String,
}

/// Validate a checkout form.
///
/// Returns the typed shipping address when every rule passes, or the
/// field-scoped error map otherwise. Length rules count characters.
///
/// # Errors
///
/// Returns [`FieldErrors`] keyed by wire field name; messages match what
/// the checkout UI renders inline.
pub fn validate(form: &CheckoutForm) -> Result<ShippingAddress, FieldErrors> {
    let mut errors = FieldErrors::new();

    if form.name.is_empty() {
        errors.insert("name", "Name is required");
    } else if form.name.chars().count() < 5 {
        errors.insert("name", "Name must be more than 5 letters");
    }

    let email = match Email::parse(&form.email) {
        Ok(email) => Some(email),
        Err(EmailError::Empty) => {
            errors.insert("email", "Email is required");
            None
        }
        Err(_) => {
            errors.insert("email", "Email is invalid");
            None
        }
    };

    if form.city.is_empty() {
        errors.insert("city", "City is required");
    } else if form.city.chars().count() < 5 {
        errors.insert("city", "City must be more than 5 letters");
    }

    let phone = match Phone::parse(&form.phone) {
        Ok(phone) => Some(phone),
        Err(PhoneError::Empty) => {
            errors.insert("phone", "Phone number is required");
            None
        }
        Err(_) => {
            errors.insert("phone", "Phone number is invalid");
            None
        }
    };

    if form.address.is_empty() {
        errors.insert("address", "Address is required");
    } else if form.address.chars().count() < 10 {
        errors.insert("address", "Address must be more than 10 letters");
    }

    if form.payment_method.requires_card()
        && !form.card.as_ref().is_some_and(CardDetails::is_complete)
    {
        errors.insert("card", "Credit card information is incomplete");
    }

    match (email, phone) {
        (Some(email), Some(phone)) if errors.is_empty() => Ok(ShippingAddress {
            name: form.name.clone(),
            email,
            city: form.city.clone(),
            phone,
            address: form.address.clone(),
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            name: "Kasun Silva".to_owned(),
            email: "kasun@example.com".to_owned(),
            city: "Colombo".to_owned(),
            phone: "0771234567".to_owned(),
            address: "12 Galle Road, Colombo 03".to_owned(),
            payment_method: PaymentMethod::CashOnDelivery,
            total_price: Decimal::from(125_000),
            card: None,
        }
    }

    fn complete_card() -> CardDetails {
        CardDetails {
            number: "4242424242424242".to_owned(),
            exp_month: "12".to_owned(),
            exp_year: "2030".to_owned(),
            cvc: "123".to_owned(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let address = validate(&valid_form()).unwrap();
        assert_eq!(address.name, "Kasun Silva");
        assert_eq!(address.email.as_str(), "kasun@example.com");
    }

    #[test]
    fn test_name_rules() {
        let mut form = valid_form();
        form.name = String::new();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));

        form.name = "abcd".to_owned();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("name"), Some("Name must be more than 5 letters"));

        form.name = "abcde".to_owned();
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn test_email_rules() {
        let mut form = valid_form();
        form.email = String::new();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));

        form.email = "not-an-email".to_owned();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is invalid"));

        form.email = "user@domain".to_owned();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is invalid"));
    }

    #[test]
    fn test_city_rules() {
        let mut form = valid_form();
        form.city = String::new();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("city"), Some("City is required"));

        form.city = "Uva".to_owned();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("city"), Some("City must be more than 5 letters"));
    }

    #[test]
    fn test_phone_rules() {
        let mut form = valid_form();
        form.phone = String::new();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("phone"), Some("Phone number is required"));

        form.phone = "123".to_owned();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("phone"), Some("Phone number is invalid"));

        form.phone = "077-1234567".to_owned();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("phone"), Some("Phone number is invalid"));
    }

    #[test]
    fn test_address_rules() {
        let mut form = valid_form();
        form.address = String::new();
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.get("address"), Some("Address is required"));

        form.address = "short one".to_owned(); // 9 chars
        let errors = validate(&form).unwrap_err();
        assert_eq!(
            errors.get("address"),
            Some("Address must be more than 10 letters")
        );

        form.address = "long enough".to_owned(); // 11 chars
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn test_card_required_for_card_payments() {
        let mut form = valid_form();
        form.payment_method = PaymentMethod::CreditCard;
        form.card = None;
        let errors = validate(&form).unwrap_err();
        assert_eq!(
            errors.get("card"),
            Some("Credit card information is incomplete")
        );

        form.card = Some(complete_card());
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn test_card_error_regardless_of_other_fields() {
        // Card error must surface even when every other field is invalid.
        let form = CheckoutForm {
            name: String::new(),
            email: String::new(),
            city: String::new(),
            phone: String::new(),
            address: String::new(),
            payment_method: PaymentMethod::CreditCard,
            total_price: Decimal::ZERO,
            card: None,
        };
        let errors = validate(&form).unwrap_err();
        assert_eq!(
            errors.get("card"),
            Some("Credit card information is incomplete")
        );
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_incomplete_card_variants() {
        let mut card = complete_card();
        card.number = "4242".to_owned();
        assert!(!card.is_complete());

        let mut card = complete_card();
        card.exp_month = "13".to_owned();
        assert!(!card.is_complete());

        let mut card = complete_card();
        card.cvc = String::new();
        assert!(!card.is_complete());

        assert!(complete_card().is_complete());
    }

    #[test]
    fn test_cash_payment_ignores_card() {
        let mut form = valid_form();
        form.payment_method = PaymentMethod::CashOnDelivery;
        form.card = None;
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn test_aggregates_all_field_errors() {
        let form = CheckoutForm {
            name: "ab".to_owned(),
            email: "bad".to_owned(),
            city: "x".to_owned(),
            phone: "1".to_owned(),
            address: "y".to_owned(),
            payment_method: PaymentMethod::CashOnDelivery,
            total_price: Decimal::ZERO,
            card: None,
        };
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.len(), 5);
    }
}
