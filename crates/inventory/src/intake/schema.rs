//! Schema rules for the product form.
//!
//! The form arrives as loose JSON; every rule is evaluated before any
//! network call and failures are reported per field, in the wire field
//! names the UI binds to. Numeric fields distinguish "missing" from
//! "not a number" from "negative".

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use techmart_core::{EncodedImage, FieldErrors};

/// Product form values after validation, minus the image.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub product_name: String,
    pub category: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub processor: String,
    pub os: String,
    pub graphics: String,
    pub storage: String,
}

impl ProductDraft {
    /// Attach the pending image, producing the full creation payload.
    #[must_use]
    pub fn with_image(self, image: EncodedImage) -> Product {
        Product {
            product_name: self.product_name,
            category: self.category,
            quantity: self.quantity,
            price: self.price,
            processor: self.processor,
            os: self.os,
            graphics: self.graphics,
            storage: self.storage,
            image,
        }
    }
}

/// Product creation payload sent to the platform API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub processor: String,
    pub os: String,
    pub graphics: String,
    pub storage: String,
    /// Inline base64 data URL, as the platform stores it.
    pub image: EncodedImage,
}

/// Validate a raw product form.
///
/// # Errors
///
/// Returns [`FieldErrors`] keyed by wire field name when any rule fails;
/// no draft is produced in that case.
pub fn validate(fields: &Map<String, Value>) -> Result<ProductDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let product_name = required_text(fields, "productName", "Product name", &mut errors);
    let category = required_text(fields, "category", "Category", &mut errors);
    let quantity = non_negative_number(fields, "quantity", "Quantity", &mut errors);
    let price = non_negative_number(fields, "price", "Price", &mut errors);
    let processor = required_text(fields, "processor", "Processor", &mut errors);
    let os = required_text(fields, "os", "OS", &mut errors);
    let graphics = required_text(fields, "graphics", "Graphics", &mut errors);
    let storage = required_text(fields, "storage", "Storage", &mut errors);

    match (
        product_name,
        category,
        quantity,
        price,
        processor,
        os,
        graphics,
        storage,
    ) {
        (
            Some(product_name),
            Some(category),
            Some(quantity),
            Some(price),
            Some(processor),
            Some(os),
            Some(graphics),
            Some(storage),
        ) if errors.is_empty() => Ok(ProductDraft {
            product_name,
            category,
            quantity,
            price,
            processor,
            os,
            graphics,
            storage,
        }),
        _ => Err(errors),
    }
}

/// Rule: the field must be present as a non-empty string.
fn required_text(
    fields: &Map<String, Value>,
    name: &'static str,
    label: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match fields.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => {
            errors.insert(name, format!("{label} is required"));
            None
        }
    }
}

/// Rule: the field must be present, numeric, and not negative.
fn non_negative_number(
    fields: &Map<String, Value>,
    name: &'static str,
    label: &str,
    errors: &mut FieldErrors,
) -> Option<Decimal> {
    let value = match fields.get(name) {
        None | Some(Value::Null) => {
            errors.insert(name, format!("{label} is required"));
            return None;
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.insert(name, format!("{label} is required"));
            return None;
        }
        Some(value) => value,
    };

    match parse_number(value) {
        None => {
            errors.insert(name, format!("{label} must be a number"));
            None
        }
        Some(n) if n < Decimal::ZERO => {
            errors.insert(name, format!("{label} cannot be a negative number"));
            None
        }
        Some(n) => Some(n),
    }
}

/// Parse a JSON value as a decimal; number inputs post either numbers or
/// numeric strings.
pub(crate) fn parse_number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.as_i64().map_or_else(
            || n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
            |i| Some(Decimal::from(i)),
        ),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_fields() -> Map<String, Value> {
        let Value::Object(map) = json!({
            "productName": "Aspire Vero 16",
            "category": "laptop",
            "quantity": 12,
            "price": 385_000,
            "processor": "Core Ultra 7",
            "os": "Windows 11",
            "graphics": "Intel Arc",
            "storage": "1TB NVMe",
        }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn test_valid_form_passes() {
        let draft = validate(&valid_fields()).unwrap();
        assert_eq!(draft.product_name, "Aspire Vero 16");
        assert_eq!(draft.quantity, Decimal::from(12));
        assert_eq!(draft.price, Decimal::from(385_000));
    }

    #[test]
    fn test_missing_text_field() {
        let mut fields = valid_fields();
        fields.remove("processor");
        let errors = validate(&fields).unwrap_err();
        assert_eq!(errors.get("processor"), Some("Processor is required"));
    }

    #[test]
    fn test_empty_text_field() {
        let mut fields = valid_fields();
        fields.insert("os".to_owned(), json!(""));
        let errors = validate(&fields).unwrap_err();
        assert_eq!(errors.get("os"), Some("OS is required"));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut fields = valid_fields();
        fields.insert("quantity".to_owned(), json!(-1));
        let errors = validate(&fields).unwrap_err();
        assert_eq!(
            errors.get("quantity"),
            Some("Quantity cannot be a negative number")
        );
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut fields = valid_fields();
        fields.insert("price".to_owned(), json!(-1));
        let errors = validate(&fields).unwrap_err();
        assert_eq!(errors.get("price"), Some("Price cannot be a negative number"));
    }

    #[test]
    fn test_non_numeric_quantity_is_a_type_error() {
        let mut fields = valid_fields();
        fields.insert("quantity".to_owned(), json!("a dozen"));
        let errors = validate(&fields).unwrap_err();
        assert_eq!(errors.get("quantity"), Some("Quantity must be a number"));
    }

    #[test]
    fn test_missing_number_is_required_not_type_error() {
        let mut fields = valid_fields();
        fields.remove("price");
        let errors = validate(&fields).unwrap_err();
        assert_eq!(errors.get("price"), Some("Price is required"));
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let mut fields = valid_fields();
        fields.insert("quantity".to_owned(), json!("7"));
        fields.insert("price".to_owned(), json!("19999.50"));
        let draft = validate(&fields).unwrap();
        assert_eq!(draft.quantity, Decimal::from(7));
        assert_eq!(draft.price, "19999.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_zero_quantity_and_price_allowed() {
        let mut fields = valid_fields();
        fields.insert("quantity".to_owned(), json!(0));
        fields.insert("price".to_owned(), json!(0));
        assert!(validate(&fields).is_ok());
    }

    #[test]
    fn test_all_errors_aggregate() {
        let errors = validate(&Map::new()).unwrap_err();
        assert_eq!(errors.len(), 8);
    }

    #[test]
    fn test_product_wire_form() {
        let image = EncodedImage::from_bytes("image/png", b"abc").unwrap();
        let product = validate(&valid_fields()).unwrap().with_image(image);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["productName"], json!("Aspire Vero 16"));
        assert_eq!(json["quantity"], json!(12.0));
        assert_eq!(json["image"], json!("data:image/png;base64,YWJj"));
    }
}
