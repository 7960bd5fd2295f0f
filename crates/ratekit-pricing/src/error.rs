//! Error types for pricing and risk calculations.

use ratekit_core::{CoreError, Currency};
use ratekit_curves::CurveError;
use ratekit_instruments::InstrumentError;
use ratekit_math::MathError;
use thiserror::Error;

/// Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur during pricing and risk calculations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// A curve, currency or index required by the instrument is missing.
    #[error("missing market data: {description}")]
    MissingCurve {
        /// What was looked up.
        description: String,
    },

    /// The calculator has no rule for the instrument.
    #[error("{calculator} does not support {instrument}")]
    Unsupported {
        /// Calculator name.
        calculator: &'static str,
        /// Instrument type name.
        instrument: &'static str,
    },

    /// A single-currency operation was given a multi-currency instrument.
    #[error("{operation} requires a single-currency instrument")]
    MultipleCurrencies {
        /// The operation attempted.
        operation: &'static str,
    },

    /// Curves of a provider refer to more than one currency.
    #[error("curves refer to several currencies: {currencies:?}")]
    MixedCurrencies {
        /// Every currency encountered.
        currencies: Vec<Currency>,
    },

    /// One curve backs several indices, or two names share one curve.
    #[error("curve {curve} is aliased by {aliases:?}")]
    CurveAliasing {
        /// The aliased curve.
        curve: String,
        /// The indices or curve names sharing it.
        aliases: Vec<String>,
    },

    /// Invalid input parameter.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What is wrong.
        reason: String,
    },

    /// Curve error other than missing data.
    #[error("curve error: {0}")]
    Curve(CurveError),

    /// Instrument construction error.
    #[error("instrument error: {0}")]
    Instrument(#[from] InstrumentError),

    /// Currency or FX error.
    #[error("currency error: {0}")]
    Core(#[from] CoreError),

    /// Numerical error.
    #[error("math error: {0}")]
    Math(#[from] MathError),
}

impl PricingError {
    /// Creates an unsupported-instrument error.
    #[must_use]
    pub fn unsupported(calculator: &'static str, instrument: &'static str) -> Self {
        Self::Unsupported {
            calculator,
            instrument,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Returns true for configuration errors: missing market data or
    /// currency constraints.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCurve { .. }
                | Self::MultipleCurrencies { .. }
                | Self::MixedCurrencies { .. }
                | Self::CurveAliasing { .. }
        )
    }
}

// Missing curves are configuration errors in their own right.
impl From<CurveError> for PricingError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::CurveNotFound { .. }
            | CurveError::MissingDiscountCurve { .. }
            | CurveError::MissingForwardCurve { .. } => Self::MissingCurve {
                description: err.to_string(),
            },
            other => Self::Curve(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratekit_core::IborIndex;

    #[test]
    fn test_missing_curves_map_to_configuration_errors() {
        let err: PricingError = CurveError::MissingDiscountCurve {
            currency: Currency::EUR,
        }
        .into();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("EUR"));

        let index = IborIndex::new("EURIBOR 6M", Currency::EUR, 6);
        let err: PricingError = CurveError::MissingForwardCurve { index }.into();
        assert!(matches!(err, PricingError::MissingCurve { .. }));

        let err: PricingError = CurveError::invalid_value("bad").into();
        assert!(matches!(err, PricingError::Curve(_)));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_unsupported_message() {
        let err = PricingError::unsupported("CashFlowEquivalentCalculator", "InterestRateFuture");
        assert_eq!(
            err.to_string(),
            "CashFlowEquivalentCalculator does not support InterestRateFuture"
        );
    }
}
