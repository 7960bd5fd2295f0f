//! Error types for instrument construction.

use ratekit_core::Currency;
use thiserror::Error;

/// A specialized Result type for instrument construction.
pub type InstrumentResult<T> = Result<T, InstrumentError>;

/// Errors raised while building instruments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// A time is negative or not finite.
    #[error("Invalid {field}: {value} (times must be finite and non-negative)")]
    InvalidTime {
        /// The offending field.
        field: &'static str,
        /// The value supplied.
        value: f64,
    },

    /// A leg or a multi-leg swap has no elements.
    #[error("{what} must not be empty")]
    Empty {
        /// What was empty.
        what: &'static str,
    },

    /// Payments of one leg are in different currencies.
    #[error("Leg currency mismatch: expected {expected}, found {found}")]
    MixedCurrencies {
        /// Currency of the first payment.
        expected: Currency,
        /// Conflicting currency.
        found: Currency,
    },

    /// Any other invalid instrument description.
    #[error("Invalid instrument: {reason}")]
    InvalidInstrument {
        /// What is wrong.
        reason: String,
    },
}

impl InstrumentError {
    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            reason: reason.into(),
        }
    }
}

/// Checks that a time is finite and non-negative.
pub(crate) fn check_time(field: &'static str, value: f64) -> InstrumentResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(InstrumentError::InvalidTime { field, value })
    }
}

/// Checks that a value is finite.
pub(crate) fn check_finite(field: &'static str, value: f64) -> InstrumentResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InstrumentError::invalid(format!("{field} must be finite, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_checks() {
        assert_eq!(check_time("payment time", 1.5), Ok(1.5));
        assert_eq!(
            check_time("payment time", -0.1),
            Err(InstrumentError::InvalidTime {
                field: "payment time",
                value: -0.1
            })
        );
        assert!(check_time("payment time", f64::NAN).is_err());
        assert!(check_finite("notional", f64::INFINITY).is_err());
    }
}
