//! Error types for curve calibration.

use std::fmt;

use ratekit_curves::CurveError;
use ratekit_math::linear_algebra::DecompositionMethod;
use ratekit_math::MathError;
use ratekit_pricing::PricingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for calibration operations.
pub type CalibrationResult<T> = Result<T, CalibrationError>;

/// One root search and how it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationAttempt {
    /// Decomposition used for the Newton steps.
    pub decomposition: DecompositionMethod,
    /// Why the search failed.
    pub error: MathError,
}

impl fmt::Display for CalibrationAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.decomposition, self.error)
    }
}

/// Errors that can occur during calibration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// A curve template cannot be calibrated as given.
    #[error("invalid template for curve {curve}: {reason}")]
    InvalidTemplate {
        /// Curve name.
        curve: String,
        /// What is wrong.
        reason: String,
    },

    /// Two instruments of one template define the same node time.
    #[error("curve {curve} has two instruments ending at t = {time}")]
    DuplicateNodeTime {
        /// Curve name.
        curve: String,
        /// The repeated node time.
        time: f64,
    },

    /// Invalid configuration.
    #[error("invalid calibration configuration: {reason}")]
    InvalidConfig {
        /// What is wrong.
        reason: String,
    },

    /// The root search failed with every decomposition.
    #[error("calibration of {curves:?} failed: {}", format_attempts(.attempts))]
    Failed {
        /// Curves of the joint system.
        curves: Vec<String>,
        /// Every attempt, in order.
        attempts: Vec<CalibrationAttempt>,
    },

    /// Pricing error while evaluating the instruments.
    #[error("pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Curve construction error.
    #[error("curve error: {0}")]
    Curve(#[from] CurveError),

    /// Numerical error.
    #[error("math error: {0}")]
    Math(#[from] MathError),
}

fn format_attempts(attempts: &[CalibrationAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CalibrationError {
    /// Creates an invalid template error.
    #[must_use]
    pub fn invalid_template(curve: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            curve: curve.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }

    /// Returns true for failures a different decomposition may avoid.
    #[must_use]
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::Math(e) if e.is_numerical())
    }
}

/// Stage of a calibration, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationStage {
    /// Node times and the skeleton provider are being built.
    Setup,
    /// The root finder is running.
    RootFind,
    /// A root was found.
    Converged,
    /// Every attempt failed.
    Failed,
}

impl fmt::Display for CalibrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::RootFind => write!(f, "root-find"),
            Self::Converged => write!(f, "converged"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
