//! Interpolation with node sensitivities.
//!
//! Curve parameter sensitivities need more than interpolated values: they
//! need to know how much each node contributes to a query point. Every
//! [`Interpolator`] therefore exposes [`Interpolator::node_sensitivity`], the
//! gradient of the interpolated value with respect to the node values.

mod linear;

pub use linear::LinearInterpolator;

use crate::error::MathResult;

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative with respect to x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns `∂y(x)/∂y_i` for every node `i`, in node order.
    fn node_sensitivity(&self, x: f64) -> MathResult<Vec<f64>>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}
