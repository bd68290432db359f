//! Field-scoped validation errors.

use std::collections::BTreeMap;

use serde::Serialize;

/// A map of form field name to error message.
///
/// An empty map means the form is valid. Field names are the wire-form
/// field names the UI binds to (`name`, `email`, `quantity`, ...), so the
/// map can be returned to the client as-is and rendered inline per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Create an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field. A later error for the same field
    /// replaces the earlier one.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Whether no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The error message for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Iterate over `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_means_valid() {
        let errors = FieldErrors::new();
        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "Name is required");
        assert!(!errors.is_empty());
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), None);
    }

    #[test]
    fn test_later_error_replaces() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "first");
        errors.insert("name", "second");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("second"));
    }

    #[test]
    fn test_serialize_as_object() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "Email is invalid");
        errors.insert("name", "Name is required");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "email": "Email is invalid",
                "name": "Name is required",
            })
        );
    }
}
