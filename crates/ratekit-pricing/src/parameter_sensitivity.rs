//! Curve-functional sensitivities pushed onto curve nodes.
//!
//! A discounting entry `(t, w)` on a curve contributes `w · ∂r(t)/∂r_i` to
//! node `i`. A forward entry on `[s, e]` contributes
//! `value · (∂F/∂r(s) · ∂r(s)/∂r_i + ∂F/∂r(e) · ∂r(e)/∂r_i)`. The node
//! weights `∂r(t)/∂r_i` come from the curve's own interpolation.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::DVector;
use ratekit_curves::{MulticurveProvider, YieldCurve};
use ratekit_instruments::{InstrumentDerivative, InstrumentVisitor};

use crate::calculators::PresentValueCurveSensitivityCalculator;
use crate::error::PricingResult;
use crate::sensitivity::{
    MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity, MultipleCurrencyParameterSensitivity,
};

fn add_weights(target: &mut DVector<f64>, curve: &YieldCurve, time: f64, factor: f64) -> PricingResult<()> {
    for (node, weight) in curve.parameter_sensitivity(time)?.into_iter().enumerate() {
        target[node] += factor * weight;
    }
    Ok(())
}

/// Dense node sensitivities of every curve named in `sensitivity`.
///
/// # Errors
///
/// Returns `PricingError::MissingCurve` if a named curve is not in the
/// provider.
pub fn curve_parameter_sensitivities(
    sensitivity: &MulticurveSensitivity,
    provider: &MulticurveProvider,
) -> PricingResult<BTreeMap<String, DVector<f64>>> {
    let mut result: BTreeMap<String, DVector<f64>> = BTreeMap::new();

    for (name, points) in sensitivity.discounting() {
        let curve = provider.curve(name)?;
        let vector = result
            .entry(name.clone())
            .or_insert_with(|| DVector::zeros(curve.number_of_parameters()));
        for (time, value) in points {
            add_weights(vector, curve, *time, *value)?;
        }
    }

    for (name, points) in sensitivity.forward() {
        let curve = provider.curve(name)?;
        let vector = result
            .entry(name.clone())
            .or_insert_with(|| DVector::zeros(curve.number_of_parameters()));
        for point in points {
            let df_start = curve.discount_factor(point.start())?;
            let df_end = curve.discount_factor(point.end())?;
            let (d_start, d_end) = point.rate_derivatives(df_start, df_end);
            add_weights(vector, curve, point.start(), point.value() * d_start)?;
            add_weights(vector, curve, point.end(), point.value() * d_end)?;
        }
    }

    Ok(result)
}

/// Parameter sensitivity of instruments, built on a curve sensitivity
/// calculator.
///
/// Curves listed as fixed are left out of the result; calibration uses this
/// for exogenous curves.
#[derive(Debug, Clone, Default)]
pub struct ParameterSensitivityCalculator<V = PresentValueCurveSensitivityCalculator> {
    sensitivity_calculator: V,
    fixed_curves: BTreeSet<String>,
}

impl<V> ParameterSensitivityCalculator<V>
where
    V: InstrumentVisitor<
        MulticurveProvider,
        Output = MultipleCurrencyMulticurveSensitivity,
        Error = crate::error::PricingError,
    >,
{
    /// Creates a calculator on top of a curve sensitivity calculator.
    #[must_use]
    pub fn new(sensitivity_calculator: V) -> Self {
        Self {
            sensitivity_calculator,
            fixed_curves: BTreeSet::new(),
        }
    }

    /// Excludes curves from the result.
    #[must_use]
    pub fn with_fixed_curves<I, S>(mut self, curves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fixed_curves.extend(curves.into_iter().map(Into::into));
        self
    }

    /// Curves excluded from the result.
    #[must_use]
    pub fn fixed_curves(&self) -> &BTreeSet<String> {
        &self.fixed_curves
    }

    /// Parameter sensitivity of an instrument.
    pub fn calculate(
        &self,
        derivative: &InstrumentDerivative,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyParameterSensitivity> {
        let sensitivity = derivative.accept(&self.sensitivity_calculator, provider)?;
        self.pointwise(&sensitivity, provider)
    }

    /// Parameter sensitivity of an already computed curve sensitivity.
    pub fn pointwise(
        &self,
        sensitivity: &MultipleCurrencyMulticurveSensitivity,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyParameterSensitivity> {
        sensitivity
            .iter()
            .try_fold(MultipleCurrencyParameterSensitivity::new(), |acc, (ccy, sens)| {
                curve_parameter_sensitivities(sens, provider)?
                    .into_iter()
                    .filter(|(name, _)| !self.fixed_curves.contains(name))
                    .try_fold(acc, |acc, (name, vector)| acc.plus_entry(name, ccy, vector))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::PresentValueCalculator;
    use crate::methods::test_support::{fixing, provider, DSC, FWD};
    use approx::assert_relative_eq;
    use ratekit_core::Currency;
    use ratekit_curves::bumping::bump_node;
    use ratekit_instruments::{CouponIbor, PaymentFixed};

    #[test]
    fn test_discounting_entry_on_a_node() {
        let provider = provider();
        // t = 2.0 is a node of the discounting curve.
        let sens = MulticurveSensitivity::of_discounting(DSC, vec![(2.0, 10.0)]);
        let vectors = curve_parameter_sensitivities(&sens, &provider).unwrap();
        let expected = DVector::from_vec(vec![0.0, 0.0, 10.0, 0.0, 0.0]);
        assert_eq!(vectors[DSC], expected);
    }

    #[test]
    fn test_parameter_sensitivity_matches_node_bumps() {
        let provider = provider();
        let coupon: InstrumentDerivative =
            CouponIbor::new(Currency::USD, 2.5, 0.25, 1e6, fixing(2.25)).unwrap().into();
        let result = ParameterSensitivityCalculator::new(PresentValueCurveSensitivityCalculator)
            .calculate(&coupon, &provider)
            .unwrap();
        assert_eq!(result.len(), 2);

        for curve in [DSC, FWD] {
            let vector = result.get(curve, Currency::USD).unwrap();
            for node in 0..vector.len() {
                let h = 1e-6;
                let pv = |shift: f64| {
                    let bumped = bump_node(&provider, curve, node, shift).unwrap();
                    coupon
                        .accept(&PresentValueCalculator, &bumped)
                        .unwrap()
                        .amount(Currency::USD)
                };
                let fd = (pv(h) - pv(-h)) / (2.0 * h);
                assert_relative_eq!(vector[node], fd, epsilon = 1e-4, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn test_fixed_curves_are_excluded() {
        let provider = provider();
        let coupon: InstrumentDerivative =
            CouponIbor::new(Currency::USD, 2.5, 0.25, 1e6, fixing(2.25)).unwrap().into();
        let result = ParameterSensitivityCalculator::new(PresentValueCurveSensitivityCalculator)
            .with_fixed_curves([DSC])
            .calculate(&coupon, &provider)
            .unwrap();
        assert!(result.get(DSC, Currency::USD).is_none());
        assert!(result.get(FWD, Currency::USD).is_some());
    }

    #[test]
    fn test_missing_curve_is_reported() {
        let provider = provider();
        let payment: InstrumentDerivative = PaymentFixed::new(Currency::EUR, 1.0, 1.0).unwrap().into();
        let err = ParameterSensitivityCalculator::new(PresentValueCurveSensitivityCalculator)
            .calculate(&payment, &provider)
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
