//! Linear interpolation.

use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// Piecewise linear interpolation between data points.
///
/// Outside the node range the interpolator is either strict (an error) or
/// extends the end values flat. A single node is allowed and describes a
/// constant function.
///
/// # Example
///
/// ```rust
/// use ratekit_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![0.01, 0.03])
///     .unwrap()
///     .with_flat_extrapolation();
///
/// assert!((interp.interpolate(1.5).unwrap() - 0.02).abs() < 1e-15);
/// assert_eq!(interp.node_sensitivity(1.25).unwrap(), vec![0.75, 0.25]);
/// assert_eq!(interp.interpolate(5.0).unwrap(), 0.03);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    allow_extrapolation: bool,
}

/// Where a query point falls relative to the nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Location {
    Below,
    Above,
    /// Segment index `i` (between node `i` and `i + 1`) and the weight of node `i + 1`.
    Inside(usize, f64),
    /// Exactly on the only node.
    Single,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (strictly increasing)
    /// * `ys` - Y coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if there are no points, lengths differ, or `xs` is
    /// not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.is_empty() {
            return Err(MathError::insufficient_data(1, 0));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::invalid_input("interpolation data must be finite"));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }

        Ok(Self {
            xs,
            ys,
            allow_extrapolation: false,
        })
    }

    /// Extends the first and last values flat beyond the node range.
    #[must_use]
    pub fn with_flat_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Returns the node x values.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Returns the node y values.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Returns a copy of this interpolator with new node values.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of values differs from the number of nodes.
    pub fn with_values(&self, ys: Vec<f64>) -> MathResult<Self> {
        let mut updated = Self::new(self.xs.clone(), ys)?;
        updated.allow_extrapolation = self.allow_extrapolation;
        Ok(updated)
    }

    fn locate(&self, x: f64) -> MathResult<Location> {
        let n = self.xs.len();
        let (min, max) = (self.xs[0], self.xs[n - 1]);
        if x.is_nan() {
            return Err(MathError::invalid_input("query point is NaN"));
        }
        if x < min || x > max {
            if !self.allow_extrapolation {
                return Err(MathError::ExtrapolationNotAllowed { x, min, max });
            }
            return Ok(if x < min {
                Location::Below
            } else {
                Location::Above
            });
        }
        if n == 1 {
            return Ok(Location::Single);
        }

        // Binary search for i such that xs[i] <= x <= xs[i+1]
        let i = self.xs.partition_point(|probe| *probe <= x).clamp(1, n - 1) - 1;
        let weight = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        Ok(Location::Inside(i, weight))
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        Ok(match self.locate(x)? {
            Location::Below | Location::Single => self.ys[0],
            Location::Above => self.ys[self.ys.len() - 1],
            Location::Inside(i, w) => self.ys[i] + w * (self.ys[i + 1] - self.ys[i]),
        })
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        Ok(match self.locate(x)? {
            Location::Inside(i, _) => {
                (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
            }
            _ => 0.0,
        })
    }

    fn node_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        let n = self.xs.len();
        let mut weights = vec![0.0; n];
        match self.locate(x)? {
            Location::Below | Location::Single => weights[0] = 1.0,
            Location::Above => weights[n - 1] = 1.0,
            Location::Inside(i, w) => {
                weights[i] = 1.0 - w;
                weights[i + 1] = w;
            }
        }
        Ok(weights)
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn sample() -> LinearInterpolator {
        LinearInterpolator::new(vec![0.5, 1.0, 2.0, 5.0], vec![0.01, 0.015, 0.02, 0.03])
            .unwrap()
            .with_flat_extrapolation()
    }

    #[test]
    fn test_interpolates_through_nodes() {
        let interp = sample();
        for (x, y) in interp.xs().iter().zip(interp.ys()) {
            assert_relative_eq!(interp.interpolate(*x).unwrap(), *y, epsilon = 1e-15);
        }
        assert_relative_eq!(interp.interpolate(1.5).unwrap(), 0.0175, epsilon = 1e-15);
    }

    #[test]
    fn test_flat_extrapolation() {
        let interp = sample();
        assert_relative_eq!(interp.interpolate(0.1).unwrap(), 0.01);
        assert_relative_eq!(interp.interpolate(30.0).unwrap(), 0.03);
        assert_relative_eq!(interp.derivative(30.0).unwrap(), 0.0);
        assert_eq!(interp.node_sensitivity(0.0).unwrap(), vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(interp.node_sensitivity(9.0).unwrap(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_strict_rejects_extrapolation() {
        let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            interp.interpolate(3.0),
            Err(MathError::ExtrapolationNotAllowed { .. })
        ));
    }

    #[test]
    fn test_single_node_is_constant() {
        let interp = LinearInterpolator::new(vec![2.0], vec![0.04])
            .unwrap()
            .with_flat_extrapolation();
        assert_relative_eq!(interp.interpolate(0.3).unwrap(), 0.04);
        assert_relative_eq!(interp.interpolate(2.0).unwrap(), 0.04);
        assert_eq!(interp.node_sensitivity(7.0).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(LinearInterpolator::new(vec![], vec![]).is_err());
        assert!(LinearInterpolator::new(vec![1.0, 1.0], vec![0.0, 0.0]).is_err());
        assert!(LinearInterpolator::new(vec![1.0, 2.0], vec![0.0]).is_err());
    }

    proptest! {
        #[test]
        fn node_sensitivity_matches_bump(x in 0.0f64..6.0, node in 0usize..4) {
            let interp = sample();
            let weights = interp.node_sensitivity(x).unwrap();
            prop_assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);

            let shift = 1e-6;
            let mut ys = interp.ys().to_vec();
            ys[node] += shift;
            let bumped = interp.with_values(ys).unwrap();
            let fd = (bumped.interpolate(x).unwrap() - interp.interpolate(x).unwrap()) / shift;
            prop_assert!((fd - weights[node]).abs() < 1e-8);
        }
    }
}
