//! Daily margined interest rate futures.
//!
//! ```text
//! PV = (1 - F - reference price) · N · a · quantity
//! ```
//!
//! Margining is daily, so nothing is discounted and the present value has
//! no discounting sensitivity.

use ratekit_core::MultipleCurrencyAmount;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::InterestRateFuture;

use super::{forward_rate, forward_sensitivity, DiscountingMethod};
use crate::error::PricingResult;
use crate::sensitivity::{MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity};

/// Model price `1 - F`.
pub fn price(future: &InterestRateFuture, provider: &MulticurveProvider) -> PricingResult<f64> {
    Ok(1.0 - forward_rate(provider, future.fixing())?)
}

fn unit_value(future: &InterestRateFuture) -> f64 {
    future.notional() * future.payment_accrual() * future.quantity()
}

impl DiscountingMethod for InterestRateFuture {
    fn present_value(&self, provider: &MulticurveProvider) -> PricingResult<MultipleCurrencyAmount> {
        let margin = price(self, provider)? - self.reference_price();
        Ok(MultipleCurrencyAmount::of(self.currency(), margin * unit_value(self)))
    }

    fn present_value_curve_sensitivity(
        &self,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        // Backward sweep
        let pv_bar = 1.0;
        let price_bar = unit_value(self) * pv_bar;
        let forward_bar = -price_bar;
        let sensitivity = forward_sensitivity(provider, self.fixing(), forward_bar)?;
        Ok(MultipleCurrencyMulticurveSensitivity::of(self.currency(), sensitivity))
    }
}

/// The forward rate implied by the model price.
pub fn par_rate(future: &InterestRateFuture, provider: &MulticurveProvider) -> PricingResult<f64> {
    forward_rate(provider, future.fixing())
}

/// Curve sensitivity of [`par_rate`].
pub fn par_rate_curve_sensitivity(
    future: &InterestRateFuture,
    provider: &MulticurveProvider,
) -> PricingResult<MulticurveSensitivity> {
    forward_sensitivity(provider, future.fixing(), 1.0)
}

/// `∂PV/∂(reference price)`.
pub fn reference_price_sensitivity(future: &InterestRateFuture) -> f64 {
    -unit_value(future)
}
