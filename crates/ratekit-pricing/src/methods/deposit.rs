//! Cash deposits.
//!
//! ```text
//! PV = N · (1 + r · a) · DF(end) - N · DF(start)
//! ```

use ratekit_core::MultipleCurrencyAmount;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::Cash;

use super::{discounting_sensitivity, DiscountingMethod};
use crate::error::PricingResult;
use crate::sensitivity::{ForwardSensitivity, MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity};

impl DiscountingMethod for Cash {
    fn present_value(&self, provider: &MulticurveProvider) -> PricingResult<MultipleCurrencyAmount> {
        let df_start = provider.discount_factor(self.currency(), self.start_time())?;
        let df_end = provider.discount_factor(self.currency(), self.end_time())?;
        let repaid = self.notional() * (1.0 + self.rate() * self.accrual());
        Ok(MultipleCurrencyAmount::of(
            self.currency(),
            repaid * df_end - self.notional() * df_start,
        ))
    }

    fn present_value_curve_sensitivity(
        &self,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        let df_start = provider.discount_factor(self.currency(), self.start_time())?;
        let df_end = provider.discount_factor(self.currency(), self.end_time())?;
        // Backward sweep
        let pv_bar = 1.0;
        let df_end_bar = self.notional() * (1.0 + self.rate() * self.accrual()) * pv_bar;
        let df_start_bar = -self.notional() * pv_bar;

        let sensitivity =
            discounting_sensitivity(provider, self.currency(), self.start_time(), df_start, df_start_bar)?
                .plus(discounting_sensitivity(
                    provider,
                    self.currency(),
                    self.end_time(),
                    df_end,
                    df_end_bar,
                )?);
        Ok(MultipleCurrencyMulticurveSensitivity::of(self.currency(), sensitivity))
    }
}

/// Deposit rate making the present value zero: `(DF(start)/DF(end) - 1) / a`.
pub fn par_rate(cash: &Cash, provider: &MulticurveProvider) -> PricingResult<f64> {
    Ok(provider
        .discounting_curve(cash.currency())?
        .forward_rate(cash.start_time(), cash.end_time(), cash.accrual())?)
}

/// Curve sensitivity of [`par_rate`]: a unit forward entry on the
/// discounting curve.
pub fn par_rate_curve_sensitivity(cash: &Cash, provider: &MulticurveProvider) -> PricingResult<MulticurveSensitivity> {
    let curve = provider.discounting_curve_name(cash.currency())?;
    Ok(MulticurveSensitivity::of_forward(
        curve,
        vec![ForwardSensitivity::new(
            cash.start_time(),
            cash.end_time(),
            cash.accrual(),
            1.0,
        )],
    ))
}

/// `∂PV/∂r`: sensitivity to the deposit rate.
pub fn rate_sensitivity(cash: &Cash, provider: &MulticurveProvider) -> PricingResult<f64> {
    let df_end = provider.discount_factor(cash.currency(), cash.end_time())?;
    Ok(cash.notional() * cash.accrual() * df_end)
}
