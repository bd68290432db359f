//! Fuel-request flow for delivery runs.
//!
//! Drivers report a delivery distance; the cost is derived server-side at
//! a fixed per-kilometre rate and never taken from the caller. The request
//! date is pinned to today.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use techmart_core::FieldErrors;

use crate::clients::PlatformClient;
use crate::intake::schema::parse_number;

/// Reimbursement rate per kilometre.
pub const COST_PER_KM: i64 = 30;

/// Minimum distance eligible for a fuel request, in kilometres.
pub const MIN_DISTANCE_KM: i64 = 5;

/// Raw fuel-request form as submitted by the UI.
#[derive(Debug, Clone, Deserialize)]
pub struct FuelForm {
    /// Distance input; number inputs post numbers or numeric strings.
    #[serde(default)]
    pub distance: Option<Value>,
}

/// Fuel-request payload sent to the platform API.
#[derive(Debug, Clone, Serialize)]
pub struct FuelRequest {
    /// Delivery distance in kilometres.
    #[serde(with = "rust_decimal::serde::float")]
    pub distance: Decimal,
    /// Derived cost: distance x [`COST_PER_KM`].
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    /// Request date; always today.
    pub date: NaiveDate,
}

/// The derived reimbursement cost for a distance.
#[must_use]
pub fn derive_cost(distance: Decimal) -> Decimal {
    distance * Decimal::from(COST_PER_KM)
}

/// Validate a fuel-request form, returning the accepted distance.
///
/// # Errors
///
/// Returns [`FieldErrors`] with a `distance` entry when the input is
/// missing, non-numeric, or below the minimum.
pub fn validate(form: &FuelForm) -> Result<Decimal, FieldErrors> {
    let mut errors = FieldErrors::new();

    let value = match &form.distance {
        None | Some(Value::Null) => {
            errors.insert("distance", "Distance is required");
            return Err(errors);
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.insert("distance", "Distance is required");
            return Err(errors);
        }
        Some(value) => value,
    };

    match parse_number(value) {
        None => {
            errors.insert("distance", "Distance must be a number");
            Err(errors)
        }
        Some(distance) if distance < Decimal::from(MIN_DISTANCE_KM) => {
            errors.insert("distance", "The distance should be greater than 5 km");
            Err(errors)
        }
        Some(distance) => Ok(distance),
    }
}

/// Result of one fuel-request attempt.
#[derive(Debug, Clone)]
pub enum FuelOutcome {
    /// The request was recorded.
    Submitted {
        /// Notification message.
        message: String,
    },
    /// Validation blocked the submission; no network call was made.
    Rejected {
        /// Per-field messages.
        errors: FieldErrors,
    },
    /// The platform call failed.
    Failed {
        /// Notification message.
        message: String,
    },
}

/// Orchestrates fuel-request submissions.
#[derive(Debug, Clone)]
pub struct FuelFlow {
    platform: PlatformClient,
}

impl FuelFlow {
    /// Create a flow over the platform client.
    #[must_use]
    pub const fn new(platform: PlatformClient) -> Self {
        Self { platform }
    }

    /// Run one fuel-request attempt.
    #[instrument(skip_all)]
    pub async fn submit(&self, form: &FuelForm) -> FuelOutcome {
        let distance = match validate(form) {
            Ok(distance) => distance,
            Err(errors) => return FuelOutcome::Rejected { errors },
        };

        let request = FuelRequest {
            distance,
            cost: derive_cost(distance),
            date: Utc::now().date_naive(),
        };

        match self.platform.create_fuel_request(&request).await {
            Ok(()) => FuelOutcome::Submitted {
                message: "Fuel Request Added Successfully".to_owned(),
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to add fuel request");
                FuelOutcome::Failed {
                    message: "Failed to add fuel request".to_owned(),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derive_cost() {
        assert_eq!(derive_cost(Decimal::from(10)), Decimal::from(300));
        assert_eq!(derive_cost(Decimal::from(5)), Decimal::from(150));
    }

    #[test]
    fn test_missing_distance_is_required() {
        let errors = validate(&FuelForm { distance: None }).unwrap_err();
        assert_eq!(errors.get("distance"), Some("Distance is required"));

        let errors = validate(&FuelForm {
            distance: Some(json!("")),
        })
        .unwrap_err();
        assert_eq!(errors.get("distance"), Some("Distance is required"));
    }

    #[test]
    fn test_below_minimum_rejected() {
        let errors = validate(&FuelForm {
            distance: Some(json!(4)),
        })
        .unwrap_err();
        assert_eq!(
            errors.get("distance"),
            Some("The distance should be greater than 5 km")
        );
    }

    #[test]
    fn test_minimum_boundary_accepted() {
        let distance = validate(&FuelForm {
            distance: Some(json!(5)),
        })
        .unwrap();
        assert_eq!(distance, Decimal::from(5));
    }

    #[test]
    fn test_ten_km_costs_three_hundred() {
        let distance = validate(&FuelForm {
            distance: Some(json!(10)),
        })
        .unwrap();
        assert_eq!(derive_cost(distance), Decimal::from(300));
    }

    #[test]
    fn test_numeric_string_accepted() {
        let distance = validate(&FuelForm {
            distance: Some(json!("12.5")),
        })
        .unwrap();
        assert_eq!(distance, "12.5".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_non_numeric_rejected() {
        let errors = validate(&FuelForm {
            distance: Some(json!("far")),
        })
        .unwrap_err();
        assert_eq!(errors.get("distance"), Some("Distance must be a number"));
    }

    #[test]
    fn test_request_wire_form() {
        let request = FuelRequest {
            distance: Decimal::from(10),
            cost: derive_cost(Decimal::from(10)),
            date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({ "distance": 10.0, "cost": 300.0, "date": "2026-08-07" })
        );
    }
}
