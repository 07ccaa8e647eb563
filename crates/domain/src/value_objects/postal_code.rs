//! Brazilian postal code (CEP) value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Number of digits in a normalized postal code
pub const POSTAL_CODE_LENGTH: usize = 8;

/// A postal code normalized to exactly eight ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode {
    digits: String,
}

impl PostalCode {
    /// Parse a postal code, discarding every non-digit character
    ///
    /// `"01310-100"`, `"01310100"` and `" 01.310-100 "` all normalize to
    /// `"01310100"`.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();

        if digits.len() != POSTAL_CODE_LENGTH {
            return Err(DomainError::InvalidPostalCode(format!(
                "postal code must have {POSTAL_CODE_LENGTH} digits, got {}",
                digits.len()
            )));
        }

        Ok(Self { digits })
    }

    /// The eight digits without separators
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Human-readable `NNNNN-NNN` form
    pub fn formatted(&self) -> String {
        format!("{}-{}", &self.digits[..5], &self.digits[5..])
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl TryFrom<String> for PostalCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for PostalCode {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formatted_code() {
        let code = PostalCode::parse("01310-100").unwrap();
        assert_eq!(code.digits(), "01310100");
        assert_eq!(code.formatted(), "01310-100");
    }

    #[test]
    fn strips_noise() {
        let code = PostalCode::parse(" 01.310-100 ").unwrap();
        assert_eq!(code.digits(), "01310100");
    }

    #[test]
    fn rejects_seven_digits() {
        let err = PostalCode::parse("0131010").unwrap_err();
        assert!(matches!(err, DomainError::InvalidPostalCode(_)));
    }

    #[test]
    fn rejects_nine_digits() {
        assert!(PostalCode::parse("013101000").is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(PostalCode::parse("").is_err());
        assert!(PostalCode::parse("abc-def").is_err());
    }

    #[test]
    fn serializes_as_digits() {
        let code = PostalCode::parse("01310-100").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), r#""01310100""#);
        let back: PostalCode = serde_json::from_str(r#""01310-100""#).unwrap();
        assert_eq!(back, code);
    }
}
