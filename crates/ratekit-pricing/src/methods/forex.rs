//! FX forwards: one fixed payment per currency, each discounted on its own
//! currency's curve.

use ratekit_core::MultipleCurrencyAmount;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::{ForexForward, PaymentFixed};

use super::{discounting_sensitivity, DiscountingMethod};
use crate::error::PricingResult;
use crate::sensitivity::{MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity};

impl DiscountingMethod for ForexForward {
    fn present_value(&self, provider: &MulticurveProvider) -> PricingResult<MultipleCurrencyAmount> {
        Ok(self
            .payment_one()
            .present_value(provider)?
            .plus(&self.payment_two().present_value(provider)?))
    }

    fn present_value_curve_sensitivity(
        &self,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        Ok(self
            .payment_one()
            .present_value_curve_sensitivity(provider)?
            .plus(self.payment_two().present_value_curve_sensitivity(provider)?))
    }
}

fn discount(payment: &PaymentFixed, provider: &MulticurveProvider) -> PricingResult<f64> {
    Ok(provider.discount_factor(payment.currency(), payment.payment_time())?)
}

/// Forward FX rate, units of currency two per unit of currency one:
/// `S · DF₁(t₁) / DF₂(t₂)`.
pub fn forward_rate(forward: &ForexForward, provider: &MulticurveProvider) -> PricingResult<f64> {
    let (one, two) = forward.currencies();
    let spot = provider.fx_matrix().fx_rate(one, two)?;
    let df_one = discount(forward.payment_one(), provider)?;
    let df_two = discount(forward.payment_two(), provider)?;
    Ok(spot * df_one / df_two)
}

/// Curve sensitivity of [`forward_rate`], spot held constant.
pub fn forward_rate_curve_sensitivity(
    forward: &ForexForward,
    provider: &MulticurveProvider,
) -> PricingResult<MulticurveSensitivity> {
    let rate = forward_rate(forward, provider)?;
    let one = forward.payment_one();
    let two = forward.payment_two();
    let df_one = discount(one, provider)?;
    let df_two = discount(two, provider)?;
    // Backward sweep
    let rate_bar = 1.0;
    let df_one_bar = rate / df_one * rate_bar;
    let df_two_bar = -rate / df_two * rate_bar;
    Ok(
        discounting_sensitivity(provider, one.currency(), one.payment_time(), df_one, df_one_bar)?
            .plus(discounting_sensitivity(
                provider,
                two.currency(),
                two.payment_time(),
                df_two,
                df_two_bar,
            )?),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ratekit_core::{Currency, FxMatrix};
    use ratekit_curves::{MulticurveProviderBuilder, YieldCurve};

    fn provider() -> MulticurveProvider {
        let fx = FxMatrix::new(Currency::USD).with_rate(Currency::EUR, 1.10).unwrap();
        MulticurveProviderBuilder::new()
            .discounting_curve(Currency::USD, YieldCurve::flat("USD-OIS", 0.04).unwrap())
            .discounting_curve(Currency::EUR, YieldCurve::flat("EUR-OIS", 0.02).unwrap())
            .fx_matrix(fx)
            .build()
            .unwrap()
    }

    fn forward() -> ForexForward {
        ForexForward::new(
            PaymentFixed::new(Currency::EUR, 1.0, 1_000_000.0).unwrap(),
            PaymentFixed::new(Currency::USD, 1.0, -1_130_000.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_present_value_per_currency() {
        let provider = provider();
        let pv = forward().present_value(&provider).unwrap();
        assert_relative_eq!(pv.amount(Currency::EUR), 1_000_000.0 * (-0.02_f64).exp(), epsilon = 1e-6);
        assert_relative_eq!(pv.amount(Currency::USD), -1_130_000.0 * (-0.04_f64).exp(), epsilon = 1e-6);

        let sens = forward().present_value_curve_sensitivity(&provider).unwrap();
        assert_eq!(sens.currencies().count(), 2);
    }

    #[test]
    fn test_forward_rate_parity() {
        let provider = provider();
        let rate = forward_rate(&forward(), &provider).unwrap();
        assert_relative_eq!(rate, 1.10 * (0.02_f64).exp(), max_relative = 1e-12);

        let sens = forward_rate_curve_sensitivity(&forward(), &provider).unwrap();
        assert_relative_eq!(sens.discounting()["EUR-OIS"][0].1, -rate, max_relative = 1e-12);
        assert_relative_eq!(sens.discounting()["USD-OIS"][0].1, rate, max_relative = 1e-12);
    }
}
