//! Account address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// An account address as it appears on the wire (e.g. `one1...`).
///
/// The address encoding itself belongs to the network; this type only rejects
/// strings that can never be an address (empty, or containing whitespace or
/// control characters).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and validate an address string.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if raw.is_empty() || raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TypesError::InvalidAddress(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_address() {
        let addr = Address::parse("one1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq").unwrap();
        assert_eq!(addr.to_string(), "one1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            Address::parse(""),
            Err(TypesError::InvalidAddress(String::new()))
        );
    }

    #[test]
    fn rejects_embedded_whitespace() {
        assert!(Address::parse("one1abc def").is_err());
        assert!(Address::parse("one1abc\r").is_err());
    }

    #[test]
    fn serde_goes_through_validation() {
        let ok: Address = serde_json::from_str("\"one1xyz\"").unwrap();
        assert_eq!(ok.as_str(), "one1xyz");
        assert!(serde_json::from_str::<Address>("\"\"").is_err());
    }
}
