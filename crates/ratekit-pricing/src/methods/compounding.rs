//! Compounded Ibor coupons.
//!
//! ```text
//! PV = N · (Π_i (1 + δ_i · (F_i + s)) - 1) · DF(tp)
//! ```

use ratekit_core::MultipleCurrencyAmount;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::CouponIborCompounding;

use super::{discounting_sensitivity, forward_rate, forward_sensitivity, DiscountingMethod};
use crate::error::PricingResult;
use crate::sensitivity::MultipleCurrencyMulticurveSensitivity;

/// Growth factor `1 + δ_i · (F_i + s)` of every sub-period.
fn growth_factors(coupon: &CouponIborCompounding, provider: &MulticurveProvider) -> PricingResult<Vec<f64>> {
    coupon
        .periods()
        .iter()
        .map(|period| {
            let forward = forward_rate(provider, period.fixing())?;
            Ok(1.0 + period.accrual() * (forward + coupon.spread()))
        })
        .collect()
}

/// `Π_{j≠i} growth_j` for every `i`, without dividing.
fn products_excluding(growth: &[f64]) -> Vec<f64> {
    let n = growth.len();
    let mut result = vec![1.0; n];
    let mut prefix = 1.0;
    for i in 0..n {
        result[i] = prefix;
        prefix *= growth[i];
    }
    let mut suffix = 1.0;
    for i in (0..n).rev() {
        result[i] *= suffix;
        suffix *= growth[i];
    }
    result
}

/// Undiscounted amount paid by the coupon at the forward rates.
pub fn compounded_amount(coupon: &CouponIborCompounding, provider: &MulticurveProvider) -> PricingResult<f64> {
    let product: f64 = growth_factors(coupon, provider)?.iter().product();
    Ok(coupon.notional() * (product - 1.0))
}

/// `∂PV/∂s`: sensitivity of the present value to the spread.
pub fn spread_sensitivity(coupon: &CouponIborCompounding, provider: &MulticurveProvider) -> PricingResult<f64> {
    let growth = growth_factors(coupon, provider)?;
    let df = provider.discount_factor(coupon.currency(), coupon.payment_time())?;
    let others = products_excluding(&growth);
    let derivative: f64 = coupon
        .periods()
        .iter()
        .zip(&others)
        .map(|(period, other)| period.accrual() * other)
        .sum();
    Ok(coupon.notional() * df * derivative)
}

impl DiscountingMethod for CouponIborCompounding {
    fn present_value(&self, provider: &MulticurveProvider) -> PricingResult<MultipleCurrencyAmount> {
        let amount = compounded_amount(self, provider)?;
        let df = provider.discount_factor(self.currency(), self.payment_time())?;
        Ok(MultipleCurrencyAmount::of(self.currency(), amount * df))
    }

    fn present_value_curve_sensitivity(
        &self,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        let growth = growth_factors(self, provider)?;
        let product: f64 = growth.iter().product();
        let df = provider.discount_factor(self.currency(), self.payment_time())?;
        // Backward sweep
        let pv_bar = 1.0;
        let df_bar = self.notional() * (product - 1.0) * pv_bar;
        let product_bar = self.notional() * df * pv_bar;

        let mut sensitivity =
            discounting_sensitivity(provider, self.currency(), self.payment_time(), df, df_bar)?;
        for (period, other) in self.periods().iter().zip(products_excluding(&growth)) {
            let growth_bar = product_bar * other;
            let forward_bar = period.accrual() * growth_bar;
            sensitivity = sensitivity.plus(forward_sensitivity(provider, period.fixing(), forward_bar)?);
        }
        Ok(MultipleCurrencyMulticurveSensitivity::of(self.currency(), sensitivity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::test_support::{check_against_bumps, fixing, provider};
    use approx::assert_relative_eq;
    use ratekit_core::Currency;
    use ratekit_instruments::CompoundingPeriod;

    fn coupon(spread: f64) -> CouponIborCompounding {
        let periods = [1.0, 1.25, 1.5, 1.75]
            .iter()
            .map(|start| CompoundingPeriod::new(fixing(*start), 0.25).unwrap())
            .collect();
        CouponIborCompounding::new(Currency::USD, 2.0, 1.0, 1_000_000.0, periods, spread).unwrap()
    }

    #[test]
    fn test_products_excluding() {
        let others = products_excluding(&[2.0, 3.0, 0.0]);
        assert_eq!(others, vec![0.0, 0.0, 6.0]);
    }

    #[test]
    fn test_compounding_exceeds_simple_sum() {
        let provider = provider();
        let coupon = coupon(0.0);
        let simple: f64 = coupon
            .periods()
            .iter()
            .map(|p| {
                let f = provider
                    .forward_rate(p.fixing().index(), p.fixing().start(), p.fixing().end(), 0.25)
                    .unwrap();
                1_000_000.0 * 0.25 * f
            })
            .sum();
        let compounded = compounded_amount(&coupon, &provider).unwrap();
        assert!(compounded > simple);
        assert_relative_eq!(compounded, simple, max_relative = 1e-2);
    }

    #[test]
    fn test_compounding_adjoint() {
        let provider = provider();
        let coupon = coupon(0.001);
        let sens = coupon
            .present_value_curve_sensitivity(&provider)
            .unwrap()
            .sensitivity(Currency::USD);
        assert_eq!(sens.forward().values().map(Vec::len).sum::<usize>(), 4);
        check_against_bumps(&provider, &sens, |p| {
            coupon.present_value(p).unwrap().amount(Currency::USD)
        });
    }

    #[test]
    fn test_spread_sensitivity() {
        let provider = provider();
        let h = 1e-7;
        let pv = |s: f64| {
            coupon(s)
                .present_value(&provider)
                .unwrap()
                .amount(Currency::USD)
        };
        let fd = (pv(0.001 + h) - pv(0.001 - h)) / (2.0 * h);
        let analytic = spread_sensitivity(&coupon(0.001), &provider).unwrap();
        assert_relative_eq!(analytic, fd, max_relative = 1e-6);
    }
}
