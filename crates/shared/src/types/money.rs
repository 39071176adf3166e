//! Currency codes for amounts kept in integer minor units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `i64` minor units (e.g., cents); any division goes through
//! `rust_decimal` in the core crate.

use serde::{Deserialize, Serialize};

/// Amount in the smallest currency unit (e.g., cents).
pub type MinorUnits = i64;

/// ISO 4217 currency code, always three upper-case ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses a currency code, normalizing to upper case.
    ///
    /// # Errors
    ///
    /// Returns an error message if the code is not three ASCII letters.
    pub fn parse(code: &str) -> Result<Self, String> {
        let normalized = code.trim().to_ascii_uppercase();
        if normalized.len() == 3 && normalized.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(Self(normalized))
        } else {
            Err(format!("Unknown currency: {code}"))
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_currency_from_str() {
        assert_eq!(CurrencyCode::from_str("USD").unwrap().as_str(), "USD");
        assert_eq!(CurrencyCode::from_str("eur").unwrap().as_str(), "EUR");
        assert_eq!(CurrencyCode::from_str(" aud ").unwrap().as_str(), "AUD");

        assert!(CurrencyCode::from_str("XXXX").is_err());
        assert!(CurrencyCode::from_str("U1D").is_err());
        assert!(CurrencyCode::from_str("").is_err());
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(CurrencyCode::parse("idr").unwrap().to_string(), "IDR");
    }

    #[test]
    fn test_currency_serde() {
        let code: CurrencyCode = serde_json::from_str("\"usd\"").unwrap();
        assert_eq!(code.as_str(), "USD");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"USD\"");
        assert!(serde_json::from_str::<CurrencyCode>("\"dollars\"").is_err());
    }
}
