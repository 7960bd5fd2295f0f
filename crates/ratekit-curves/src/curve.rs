//! Node-based zero-rate yield curves.

use serde::{Deserialize, Serialize};

use ratekit_math::interpolation::{Interpolator, LinearInterpolator};

use crate::error::{CurveError, CurveResult};
use crate::interpolation::InterpolationMethod;

/// Serialized form of a [`YieldCurve`]: its name, nodes and interpolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveNodes {
    /// Curve name.
    pub name: String,
    /// Node times in years, strictly increasing.
    pub times: Vec<f64>,
    /// Continuously compounded zero rates at the nodes.
    pub rates: Vec<f64>,
    /// Interpolation between nodes.
    #[serde(default)]
    pub interpolation: InterpolationMethod,
}

/// A named yield curve parametrised by continuously compounded zero rates.
///
/// The node zero rates are the curve parameters: parameter sensitivities
/// and calibration both work on them. Beyond the node range the zero rate is
/// extended flat.
///
/// Curves are immutable. Bumps and calibration updates build new curves
/// through [`with_node_values`](Self::with_node_values) and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveNodes", into = "CurveNodes")]
pub struct YieldCurve {
    name: String,
    interpolation: InterpolationMethod,
    rates: Vec<f64>,
    /// Interpolates `r` (Linear) or `r·t` (LinearRateTime) over node times.
    interpolator: LinearInterpolator,
}

impl YieldCurve {
    /// Creates a curve from node times and zero rates.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no nodes, lengths differ, a time is
    /// negative, times are not strictly increasing, or a value is not finite.
    pub fn new(
        name: impl Into<String>,
        times: Vec<f64>,
        rates: Vec<f64>,
        interpolation: InterpolationMethod,
    ) -> CurveResult<Self> {
        if times.is_empty() {
            return Err(CurveError::InsufficientPoints {
                required: 1,
                got: 0,
            });
        }
        if times.len() != rates.len() {
            return Err(CurveError::invalid_value(format!(
                "{} node times but {} rates",
                times.len(),
                rates.len()
            )));
        }
        if let Some(bad) = times.iter().chain(rates.iter()).find(|v| !v.is_finite()) {
            return Err(CurveError::invalid_value(format!(
                "non-finite node value {bad}"
            )));
        }
        if times[0] < 0.0 {
            return Err(CurveError::invalid_value(format!(
                "negative node time {}",
                times[0]
            )));
        }
        for (i, w) in times.windows(2).enumerate() {
            if w[1] <= w[0] {
                return Err(CurveError::NonMonotonicTenors {
                    index: i + 1,
                    prev: w[0],
                    current: w[1],
                });
            }
        }

        let ys = Self::interpolated_values(interpolation, &times, &rates);
        let interpolator = LinearInterpolator::new(times, ys)?.with_flat_extrapolation();
        Ok(Self {
            name: name.into(),
            interpolation,
            rates,
            interpolator,
        })
    }

    /// Creates a curve with a single node, i.e. a flat zero rate.
    pub fn flat(name: impl Into<String>, rate: f64) -> CurveResult<Self> {
        Self::new(name, vec![1.0], vec![rate], InterpolationMethod::Linear)
    }

    fn interpolated_values(method: InterpolationMethod, times: &[f64], rates: &[f64]) -> Vec<f64> {
        match method {
            InterpolationMethod::Linear => rates.to_vec(),
            InterpolationMethod::LinearRateTime => {
                times.iter().zip(rates).map(|(t, r)| t * r).collect()
            }
        }
    }

    /// Returns the curve name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the interpolation method.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolation
    }

    /// Returns the node times.
    #[must_use]
    pub fn node_times(&self) -> &[f64] {
        self.interpolator.xs()
    }

    /// Returns the node zero rates (the curve parameters).
    #[must_use]
    pub fn node_values(&self) -> &[f64] {
        &self.rates
    }

    /// Returns the number of curve parameters.
    #[must_use]
    pub fn number_of_parameters(&self) -> usize {
        self.rates.len()
    }

    fn check_time(&self, t: f64) -> CurveResult<()> {
        if t.is_finite() && t >= 0.0 {
            Ok(())
        } else {
            Err(CurveError::invalid_value(format!(
                "curve {} queried at invalid time {t}",
                self.name
            )))
        }
    }

    fn first_time(&self) -> f64 {
        self.interpolator.min_x()
    }

    fn last_time(&self) -> f64 {
        self.interpolator.max_x()
    }

    /// Returns the continuously compounded zero rate at `t`.
    pub fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        self.check_time(t)?;
        match self.interpolation {
            InterpolationMethod::Linear => Ok(self.interpolator.interpolate(t)?),
            InterpolationMethod::LinearRateTime => {
                if t <= self.first_time() {
                    Ok(self.rates[0])
                } else if t >= self.last_time() {
                    Ok(self.rates[self.rates.len() - 1])
                } else {
                    Ok(self.interpolator.interpolate(t)? / t)
                }
            }
        }
    }

    /// Returns the discount factor `exp(-r(t)·t)`.
    pub fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        Ok((-self.zero_rate(t)? * t).exp())
    }

    /// Returns the simply compounded forward rate
    /// `(DF(start)/DF(end) - 1) / accrual`.
    pub fn forward_rate(&self, start: f64, end: f64, accrual: f64) -> CurveResult<f64> {
        if !(accrual.is_finite() && accrual > 0.0) {
            return Err(CurveError::invalid_value(format!(
                "forward accrual must be positive, got {accrual}"
            )));
        }
        Ok((self.discount_factor(start)? / self.discount_factor(end)? - 1.0) / accrual)
    }

    /// Returns `∂r(t)/∂r_i` for every node `i`.
    pub fn parameter_sensitivity(&self, t: f64) -> CurveResult<Vec<f64>> {
        self.check_time(t)?;
        match self.interpolation {
            InterpolationMethod::Linear => Ok(self.interpolator.node_sensitivity(t)?),
            InterpolationMethod::LinearRateTime => {
                let n = self.rates.len();
                if t <= self.first_time() || t >= self.last_time() {
                    let mut weights = vec![0.0; n];
                    let node = if t <= self.first_time() { 0 } else { n - 1 };
                    weights[node] = 1.0;
                    return Ok(weights);
                }
                let weights = self.interpolator.node_sensitivity(t)?;
                Ok(weights
                    .iter()
                    .zip(self.node_times())
                    .map(|(w, ti)| w * ti / t)
                    .collect())
            }
        }
    }

    /// Returns a copy with new node zero rates.
    pub fn with_node_values(&self, rates: Vec<f64>) -> CurveResult<Self> {
        if rates.len() != self.rates.len() {
            return Err(CurveError::invalid_value(format!(
                "curve {} has {} nodes, got {} values",
                self.name,
                self.rates.len(),
                rates.len()
            )));
        }
        Self::new(
            self.name.clone(),
            self.node_times().to_vec(),
            rates,
            self.interpolation,
        )
    }

    /// Returns a copy with one node zero rate shifted.
    pub fn with_bumped_node(&self, node: usize, shift: f64) -> CurveResult<Self> {
        let mut rates = self.rates.clone();
        let count = rates.len();
        let value = rates.get_mut(node).ok_or_else(|| CurveError::NodeOutOfRange {
            curve: self.name.clone(),
            node,
            count,
        })?;
        *value += shift;
        self.with_node_values(rates)
    }

    /// Returns a copy with every node zero rate shifted.
    pub fn with_parallel_shift(&self, shift: f64) -> CurveResult<Self> {
        self.with_node_values(self.rates.iter().map(|r| r + shift).collect())
    }

    /// Returns a copy under a different name.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl TryFrom<CurveNodes> for YieldCurve {
    type Error = CurveError;

    fn try_from(nodes: CurveNodes) -> Result<Self, Self::Error> {
        Self::new(nodes.name, nodes.times, nodes.rates, nodes.interpolation)
    }
}

impl From<YieldCurve> for CurveNodes {
    fn from(curve: YieldCurve) -> Self {
        Self {
            times: curve.node_times().to_vec(),
            name: curve.name,
            rates: curve.rates,
            interpolation: curve.interpolation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn curve(method: InterpolationMethod) -> YieldCurve {
        YieldCurve::new(
            "TEST",
            vec![0.5, 1.0, 2.0, 5.0, 10.0],
            vec![0.010, 0.015, 0.020, 0.027, 0.031],
            method,
        )
        .unwrap()
    }

    #[test]
    fn test_flat_curve() {
        let flat = YieldCurve::flat("FLAT", 0.02).unwrap();
        assert_relative_eq!(flat.discount_factor(0.0).unwrap(), 1.0);
        assert_relative_eq!(flat.discount_factor(3.0).unwrap(), (-0.06f64).exp());
        assert_relative_eq!(flat.zero_rate(40.0).unwrap(), 0.02);
        assert_eq!(flat.parameter_sensitivity(7.0).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_linear_zero_rates() {
        let c = curve(InterpolationMethod::Linear);
        assert_relative_eq!(c.zero_rate(1.5).unwrap(), 0.0175, epsilon = 1e-15);
        assert_relative_eq!(c.zero_rate(0.1).unwrap(), 0.010);
        assert_relative_eq!(c.zero_rate(30.0).unwrap(), 0.031);
    }

    #[test]
    fn test_linear_rate_time_zero_rates() {
        let c = curve(InterpolationMethod::LinearRateTime);
        // r·t is linear between nodes: (0.015 + 0.040) / 2 at t = 1.5
        assert_relative_eq!(c.zero_rate(1.5).unwrap() * 1.5, 0.0275, epsilon = 1e-15);
        for (t, r) in c.node_times().iter().zip(c.node_values()) {
            assert_relative_eq!(c.zero_rate(*t).unwrap(), *r, epsilon = 1e-15);
        }
        assert_relative_eq!(c.zero_rate(0.2).unwrap(), 0.010);
        assert_relative_eq!(c.zero_rate(20.0).unwrap(), 0.031);
    }

    #[test]
    fn test_forward_rate() {
        let c = curve(InterpolationMethod::Linear);
        let expected = (c.discount_factor(1.0).unwrap() / c.discount_factor(1.25).unwrap() - 1.0)
            / 0.25;
        assert_relative_eq!(c.forward_rate(1.0, 1.25, 0.25).unwrap(), expected);
        assert!(c.forward_rate(1.0, 1.25, 0.0).is_err());
    }

    #[test]
    fn test_invalid_curves() {
        let m = InterpolationMethod::Linear;
        assert!(matches!(
            YieldCurve::new("X", vec![], vec![], m),
            Err(CurveError::InsufficientPoints { .. })
        ));
        assert!(matches!(
            YieldCurve::new("X", vec![1.0, 1.0], vec![0.01, 0.02], m),
            Err(CurveError::NonMonotonicTenors { index: 1, .. })
        ));
        assert!(YieldCurve::new("X", vec![-1.0], vec![0.01], m).is_err());
        assert!(YieldCurve::new("X", vec![1.0], vec![f64::NAN], m).is_err());
        assert!(curve(m).zero_rate(-0.5).is_err());
    }

    #[test]
    fn test_bumps() {
        let c = curve(InterpolationMethod::Linear);
        let bumped = c.with_bumped_node(2, 0.0001).unwrap();
        assert_relative_eq!(bumped.node_values()[2], 0.0201, epsilon = 1e-15);
        assert_relative_eq!(bumped.node_values()[1], 0.015);
        assert!(matches!(
            c.with_bumped_node(9, 0.0001),
            Err(CurveError::NodeOutOfRange { node: 9, count: 5, .. })
        ));

        let shifted = c.with_parallel_shift(0.01).unwrap();
        assert_relative_eq!(
            shifted.zero_rate(3.3).unwrap(),
            c.zero_rate(3.3).unwrap() + 0.01,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = curve(InterpolationMethod::LinearRateTime);
        let json = serde_json::to_string(&c).unwrap();
        let back: YieldCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);

        let bad = r#"{"name":"X","times":[2.0,1.0],"rates":[0.0,0.0]}"#;
        assert!(serde_json::from_str::<YieldCurve>(bad).is_err());
    }

    proptest! {
        #[test]
        fn parameter_sensitivity_matches_bump(
            t in 0.0f64..15.0,
            node in 0usize..5,
            rate_time in proptest::bool::ANY,
        ) {
            let method = if rate_time {
                InterpolationMethod::LinearRateTime
            } else {
                InterpolationMethod::Linear
            };
            let c = curve(method);
            let analytic = c.parameter_sensitivity(t).unwrap();

            let shift = 1e-6;
            let up = c.with_bumped_node(node, shift).unwrap().zero_rate(t).unwrap();
            let down = c.with_bumped_node(node, -shift).unwrap().zero_rate(t).unwrap();
            let fd = (up - down) / (2.0 * shift);
            prop_assert!((fd - analytic[node]).abs() < 1e-7);
        }
    }
}
