//! Forward rate agreements.
//!
//! ```text
//! PV = N · a · (F - K) / (1 + a · F) · DF(tp)
//! ```

use ratekit_core::MultipleCurrencyAmount;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::ForwardRateAgreement;

use super::{discounting_sensitivity, forward_rate, forward_sensitivity, DiscountingMethod};
use crate::error::PricingResult;
use crate::sensitivity::{MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity};

/// Undiscounted settlement amount at the forward rate.
pub fn settlement_amount(fra: &ForwardRateAgreement, provider: &MulticurveProvider) -> PricingResult<f64> {
    let forward = forward_rate(provider, fra.fixing())?;
    let a = fra.payment_accrual();
    Ok(fra.notional() * a * (forward - fra.rate()) / (1.0 + a * forward))
}

impl DiscountingMethod for ForwardRateAgreement {
    fn present_value(&self, provider: &MulticurveProvider) -> PricingResult<MultipleCurrencyAmount> {
        let df = provider.discount_factor(self.currency(), self.payment_time())?;
        Ok(MultipleCurrencyAmount::of(
            self.currency(),
            settlement_amount(self, provider)? * df,
        ))
    }

    fn present_value_curve_sensitivity(
        &self,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        let forward = forward_rate(provider, self.fixing())?;
        let df = provider.discount_factor(self.currency(), self.payment_time())?;
        let a = self.payment_accrual();
        let denominator = 1.0 + a * forward;
        // Backward sweep
        let pv_bar = 1.0;
        let df_bar = self.notional() * a * (forward - self.rate()) / denominator * pv_bar;
        let forward_bar =
            self.notional() * df * a * (1.0 + a * self.rate()) / (denominator * denominator) * pv_bar;

        let sensitivity =
            discounting_sensitivity(provider, self.currency(), self.payment_time(), df, df_bar)?
                .plus(forward_sensitivity(provider, self.fixing(), forward_bar)?);
        Ok(MultipleCurrencyMulticurveSensitivity::of(self.currency(), sensitivity))
    }
}

/// The forward rate of the fixing, which makes the FRA worthless.
pub fn par_rate(fra: &ForwardRateAgreement, provider: &MulticurveProvider) -> PricingResult<f64> {
    forward_rate(provider, fra.fixing())
}

/// Curve sensitivity of [`par_rate`].
pub fn par_rate_curve_sensitivity(
    fra: &ForwardRateAgreement,
    provider: &MulticurveProvider,
) -> PricingResult<MulticurveSensitivity> {
    forward_sensitivity(provider, fra.fixing(), 1.0)
}

/// `∂PV/∂K`: sensitivity to the contractual rate.
pub fn rate_sensitivity(fra: &ForwardRateAgreement, provider: &MulticurveProvider) -> PricingResult<f64> {
    let forward = forward_rate(provider, fra.fixing())?;
    let df = provider.discount_factor(fra.currency(), fra.payment_time())?;
    let a = fra.payment_accrual();
    Ok(-fra.notional() * a * df / (1.0 + a * forward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::test_support::{check_against_bumps, fixing, provider};
    use approx::assert_relative_eq;
    use ratekit_core::Currency;

    fn fra(rate: f64) -> ForwardRateAgreement {
        ForwardRateAgreement::new(Currency::USD, 1.0, 0.25, 10_000_000.0, fixing(1.0), rate).unwrap()
    }

    #[test]
    fn test_fra_at_forward_is_worthless() {
        let provider = provider();
        let forward = par_rate(&fra(0.0), &provider).unwrap();
        let pv = fra(forward).present_value(&provider).unwrap();
        assert_relative_eq!(pv.amount(Currency::USD), 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_fra_adjoint() {
        let provider = provider();
        let fra = fra(0.031);
        let sens = fra
            .present_value_curve_sensitivity(&provider)
            .unwrap()
            .sensitivity(Currency::USD);
        check_against_bumps(&provider, &sens, |p| {
            fra.present_value(p).unwrap().amount(Currency::USD)
        });

        let par_sens = par_rate_curve_sensitivity(&fra, &provider).unwrap();
        check_against_bumps(&provider, &par_sens, |p| par_rate(&fra, p).unwrap());
    }

    #[test]
    fn test_rate_sensitivity() {
        let provider = provider();
        let h = 1e-7;
        let pv = |k: f64| fra(k).present_value(&provider).unwrap().amount(Currency::USD);
        let fd = (pv(0.03 + h) - pv(0.03 - h)) / (2.0 * h);
        assert_relative_eq!(rate_sensitivity(&fra(0.03), &provider).unwrap(), fd, max_relative = 1e-6);
    }
}
