//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character that is not an ASCII digit.
    #[error("phone number may only contain digits")]
    NonDigit,
    /// The digit count is outside the accepted range.
    #[error("phone number must be {min} to {max} digits")]
    WrongLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A phone number: 10 to 15 ASCII digits, nothing else.
///
/// The checkout form accepts numbers without separators, matching the
/// platform API's wire contract.
///
/// ## Examples
///
/// ```
/// use techmart_core::Phone;
///
/// assert!(Phone::parse("0771234567").is_ok());
/// assert!(Phone::parse("94771234567").is_ok());
///
/// assert!(Phone::parse("").is_err());          // empty
/// assert!(Phone::parse("077-123").is_err());   // separator
/// assert!(Phone::parse("123456789").is_err()); // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum digit count.
    pub const MIN_DIGITS: usize = 10;
    /// Maximum digit count.
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains a non-digit
    /// character, or has fewer than 10 or more than 15 digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        if s.len() < Self::MIN_DIGITS || s.len() > Self::MAX_DIGITS {
            return Err(PhoneError::WrongLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Phone::parse("0771234567").is_ok());
        assert!(Phone::parse("94771234567").is_ok());
        assert!(Phone::parse("123456789012345").is_ok()); // 15 digits
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_non_digit() {
        assert!(matches!(
            Phone::parse("077-1234567"),
            Err(PhoneError::NonDigit)
        ));
        assert!(matches!(
            Phone::parse("+94771234567"),
            Err(PhoneError::NonDigit)
        ));
        assert!(matches!(
            Phone::parse("07712 34567"),
            Err(PhoneError::NonDigit)
        ));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            Phone::parse("123456789"), // 9 digits
            Err(PhoneError::WrongLength { .. })
        ));
        assert!(matches!(
            Phone::parse("1234567890123456"), // 16 digits
            Err(PhoneError::WrongLength { .. })
        ));
    }

    #[test]
    fn test_boundaries() {
        assert!(Phone::parse(&"1".repeat(10)).is_ok());
        assert!(Phone::parse(&"1".repeat(15)).is_ok());
        assert!(Phone::parse(&"1".repeat(9)).is_err());
        assert!(Phone::parse(&"1".repeat(16)).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = Phone::parse("0771234567").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"0771234567\"");

        let parsed: Phone = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
