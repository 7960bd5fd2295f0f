//! Currency type with ISO 4217 codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// ISO 4217 currency codes.
///
/// Currencies key present values, discounting curves and FX rates. The
/// ordering is the declaration order and gives deterministic iteration in
/// currency-keyed maps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[non_exhaustive]
pub enum Currency {
    /// United States Dollar
    #[default]
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// Swiss Franc
    CHF,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
    /// New Zealand Dollar
    NZD,
    /// Swedish Krona
    SEK,
    /// Norwegian Krone
    NOK,
}

impl Currency {
    /// All supported currencies in declaration order.
    pub const ALL: [Currency; 10] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
        Currency::CAD,
        Currency::AUD,
        Currency::NZD,
        Currency::SEK,
        Currency::NOK,
    ];

    /// Returns the ISO 4217 3-letter code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::NZD => "NZD",
            Currency::SEK => "SEK",
            Currency::NOK => "NOK",
        }
    }

    /// Parses a currency from a string code (case-insensitive).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let upper = code.to_uppercase();
        Self::ALL.into_iter().find(|c| c.code() == upper)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| CoreError::UnknownCurrency {
            code: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code() {
        assert_eq!(Currency::USD.code(), "USD");
        assert_eq!(Currency::EUR.code(), "EUR");
        assert_eq!(Currency::JPY.to_string(), "JPY");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("gbp".parse::<Currency>().unwrap(), Currency::GBP);
        assert!(matches!(
            "XYZ".parse::<Currency>(),
            Err(CoreError::UnknownCurrency { .. })
        ));
    }

    #[test]
    fn test_ordering_is_declaration_order() {
        let mut ccys = vec![Currency::NOK, Currency::EUR, Currency::USD];
        ccys.sort();
        assert_eq!(ccys, vec![Currency::USD, Currency::EUR, Currency::NOK]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Currency::CHF).unwrap();
        assert_eq!(json, "\"CHF\"");
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Currency::CHF);
    }
}
