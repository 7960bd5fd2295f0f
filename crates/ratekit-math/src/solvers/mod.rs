//! Root-finding algorithms for systems of equations.
//!
//! - [`BroydenVectorRootFinder`]: quasi-Newton solver that starts from an
//!   analytic Jacobian and maintains it with rank-one Broyden updates
//!
//! # Convergence
//!
//! A root is accepted only when the residual norm `‖f(x)‖` is below the
//! absolute tolerance. A step `‖Δx‖` below `relative_tolerance · (1 + ‖x‖)`
//! with the residual still above it counts as a stall: the Jacobian is
//! recomputed once, and a second stall is a convergence failure.

mod broyden;

pub use broyden::{BroydenVectorRootFinder, VectorRootResult};

use serde::{Deserialize, Serialize};

/// Default absolute tolerance for vector root finding.
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-7;

/// Default relative tolerance for vector root finding.
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-7;

/// Default maximum iterations for vector root finding.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Default number of step halvings attempted by the line search.
pub const DEFAULT_MAX_BACKTRACKS: u32 = 10;

fn default_absolute_tolerance() -> f64 {
    DEFAULT_ABSOLUTE_TOLERANCE
}

fn default_relative_tolerance() -> f64 {
    DEFAULT_RELATIVE_TOLERANCE
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

fn default_max_backtracks() -> u32 {
    DEFAULT_MAX_BACKTRACKS
}

/// Configuration for vector root finders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorRootFinderConfig {
    /// Residual norm below which the root is accepted.
    #[serde(default = "default_absolute_tolerance")]
    pub absolute_tolerance: f64,
    /// Step size, relative to the solution size, below which iteration stops.
    #[serde(default = "default_relative_tolerance")]
    pub relative_tolerance: f64,
    /// Maximum number of iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Maximum step halvings per iteration before the Jacobian is refreshed.
    #[serde(default = "default_max_backtracks")]
    pub max_backtracks: u32,
}

impl Default for VectorRootFinderConfig {
    fn default() -> Self {
        Self {
            absolute_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_backtracks: DEFAULT_MAX_BACKTRACKS,
        }
    }
}

impl VectorRootFinderConfig {
    /// Creates a new configuration.
    #[must_use]
    pub fn new(absolute_tolerance: f64, relative_tolerance: f64, max_iterations: u32) -> Self {
        Self {
            absolute_tolerance,
            relative_tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Sets the absolute tolerance.
    #[must_use]
    pub fn with_absolute_tolerance(mut self, tolerance: f64) -> Self {
        self.absolute_tolerance = tolerance;
        self
    }

    /// Sets the relative tolerance.
    #[must_use]
    pub fn with_relative_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Validates the tolerances and limits.
    pub fn validate(&self) -> crate::MathResult<()> {
        if !(self.absolute_tolerance > 0.0 && self.relative_tolerance > 0.0) {
            return Err(crate::MathError::invalid_input(
                "root finder tolerances must be positive",
            ));
        }
        if self.max_iterations == 0 {
            return Err(crate::MathError::invalid_input(
                "root finder needs at least one iteration",
            ));
        }
        Ok(())
    }
}
