//! Error types for curve operations.

use ratekit_core::{Currency, IborIndex};
use ratekit_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Not enough nodes to build a curve.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        got: usize,
    },

    /// Node times are not strictly increasing.
    #[error("Non-monotonic node times at index {index}: {prev:.4} >= {current:.4}")]
    NonMonotonicTenors {
        /// Index where monotonicity violation occurred.
        index: usize,
        /// Previous node time.
        prev: f64,
        /// Current node time.
        current: f64,
    },

    /// Invalid value (NaN, Inf, or domain error).
    #[error("Invalid value: {reason}")]
    InvalidValue {
        /// Description of why value is invalid.
        reason: String,
    },

    /// No curve registered under the name.
    #[error("Curve not found: {name}")]
    CurveNotFound {
        /// The curve name.
        name: String,
    },

    /// No discounting curve for the currency.
    #[error("No discounting curve for currency {currency}")]
    MissingDiscountCurve {
        /// The currency.
        currency: Currency,
    },

    /// No forward curve for the index.
    #[error("No forward curve for index {index}")]
    MissingForwardCurve {
        /// The index.
        index: IborIndex,
    },

    /// Two different curves registered under the same name.
    #[error("Duplicate curve name: {name}")]
    DuplicateCurve {
        /// The curve name.
        name: String,
    },

    /// Node index outside the curve.
    #[error("Node {node} out of range for curve {curve} with {count} nodes")]
    NodeOutOfRange {
        /// The curve name.
        curve: String,
        /// Requested node index.
        node: usize,
        /// Number of nodes.
        count: usize,
    },

    /// Mathematical error.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl CurveError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    /// Creates a curve not found error.
    #[must_use]
    pub fn curve_not_found(name: impl Into<String>) -> Self {
        Self::CurveNotFound { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CurveError::MissingDiscountCurve {
            currency: Currency::EUR,
        };
        assert_eq!(err.to_string(), "No discounting curve for currency EUR");

        let err: CurveError = MathError::singular("zero pivot").into();
        assert!(err.to_string().contains("zero pivot"));
    }
}
