//! PV01: present value change for a one basis point move of each curve.

use std::collections::BTreeMap;

use ratekit_core::Currency;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::InstrumentDerivative;

use crate::error::PricingResult;
use crate::parameter_sensitivity::ParameterSensitivityCalculator;

/// One basis point.
pub const BASIS_POINT: f64 = 1e-4;

/// PV01 per `(curve, currency)`: the sum of node sensitivities times one
/// basis point.
///
/// Under the zero-rate parametrisation this is the first-order change of
/// the present value for a parallel shift of the curve by one basis point.
#[derive(Debug, Clone, Default)]
pub struct Pv01Calculator {
    parameter: ParameterSensitivityCalculator,
}

impl Pv01Calculator {
    /// Creates a calculator on top of a parameter sensitivity calculator.
    #[must_use]
    pub fn new(parameter: ParameterSensitivityCalculator) -> Self {
        Self { parameter }
    }

    /// PV01 of an instrument.
    pub fn calculate(
        &self,
        derivative: &InstrumentDerivative,
        provider: &MulticurveProvider,
    ) -> PricingResult<BTreeMap<(String, Currency), f64>> {
        let sensitivity = self.parameter.calculate(derivative, provider)?;
        Ok(sensitivity
            .totals()
            .into_iter()
            .map(|(key, total)| (key, total * BASIS_POINT))
            .collect())
    }
}
