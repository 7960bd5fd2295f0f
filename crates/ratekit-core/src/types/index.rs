//! Ibor-style rate indices.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Currency;

/// A floating rate index such as "USD LIBOR 3M" or "EURIBOR 6M".
///
/// Only the attributes needed to route a forward-rate query are kept: the
/// name, the currency and the tenor. Fixing calendars and conventions are
/// resolved before instruments reach this library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IborIndex {
    name: String,
    currency: Currency,
    tenor_months: u32,
}

impl IborIndex {
    /// Creates a new index.
    #[must_use]
    pub fn new(name: impl Into<String>, currency: Currency, tenor_months: u32) -> Self {
        Self {
            name: name.into(),
            currency,
            tenor_months,
        }
    }

    /// Returns the index name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the index currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the index tenor in months.
    #[must_use]
    pub fn tenor_months(&self) -> u32 {
        self.tenor_months
    }
}

impl fmt::Display for IborIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_accessors() {
        let index = IborIndex::new("USD LIBOR 3M", Currency::USD, 3);
        assert_eq!(index.name(), "USD LIBOR 3M");
        assert_eq!(index.currency(), Currency::USD);
        assert_eq!(index.tenor_months(), 3);
        assert_eq!(index.to_string(), "USD LIBOR 3M");
    }

    #[test]
    fn test_indices_with_same_name_differ_by_tenor() {
        let three = IborIndex::new("EURIBOR", Currency::EUR, 3);
        let six = IborIndex::new("EURIBOR", Currency::EUR, 6);
        assert_ne!(three, six);
        assert!(three < six);
    }
}
