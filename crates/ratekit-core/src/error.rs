//! Error types for core domain values.

use thiserror::Error;

use crate::types::Currency;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by core domain types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Unknown ISO currency code.
    #[error("Unknown currency code: {code}")]
    UnknownCurrency {
        /// The code that failed to parse.
        code: String,
    },

    /// No FX rate is available for the currency.
    #[error("No FX rate available for {currency} in matrix based on {base}")]
    MissingFxRate {
        /// The currency without a rate.
        currency: Currency,
        /// The base currency of the matrix.
        base: Currency,
    },

    /// Amount requested for a single currency but several are present.
    #[error("Expected a single currency amount, found {count} currencies")]
    NotSingleCurrency {
        /// Number of currencies found.
        count: usize,
    },

    /// Invalid input value.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
