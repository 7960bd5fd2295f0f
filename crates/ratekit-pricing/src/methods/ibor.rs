//! Ibor coupons: plain, with spread, with gearing.
//!
//! All three share the geared formula
//!
//! ```text
//! PV = N · a · (g · F + s) · DF(tp)
//! ```
//!
//! with `g = 1, s = 0` for the plain coupon and `g = 1` for the spread coupon.

use ratekit_core::MultipleCurrencyAmount;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::{CouponIbor, CouponIborGearing, CouponIborSpread};

use super::{discounting_sensitivity, forward_rate, forward_sensitivity, DiscountingMethod};
use crate::error::PricingResult;
use crate::sensitivity::MultipleCurrencyMulticurveSensitivity;

fn geared_present_value(
    coupon: &CouponIbor,
    factor: f64,
    spread: f64,
    provider: &MulticurveProvider,
) -> PricingResult<MultipleCurrencyAmount> {
    let forward = forward_rate(provider, coupon.fixing())?;
    let df = provider.discount_factor(coupon.currency(), coupon.payment_time())?;
    let pv = coupon.notional() * coupon.payment_accrual() * (factor * forward + spread) * df;
    Ok(MultipleCurrencyAmount::of(coupon.currency(), pv))
}

fn geared_curve_sensitivity(
    coupon: &CouponIbor,
    factor: f64,
    spread: f64,
    provider: &MulticurveProvider,
) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
    let forward = forward_rate(provider, coupon.fixing())?;
    let df = provider.discount_factor(coupon.currency(), coupon.payment_time())?;
    let scale = coupon.notional() * coupon.payment_accrual();
    // Backward sweep
    let pv_bar = 1.0;
    let forward_bar = scale * factor * df * pv_bar;
    let df_bar = scale * (factor * forward + spread) * pv_bar;

    let sensitivity = discounting_sensitivity(provider, coupon.currency(), coupon.payment_time(), df, df_bar)?
        .plus(forward_sensitivity(provider, coupon.fixing(), forward_bar)?);
    Ok(MultipleCurrencyMulticurveSensitivity::of(coupon.currency(), sensitivity))
}

impl DiscountingMethod for CouponIbor {
    fn present_value(&self, provider: &MulticurveProvider) -> PricingResult<MultipleCurrencyAmount> {
        geared_present_value(self, 1.0, 0.0, provider)
    }

    fn present_value_curve_sensitivity(
        &self,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        geared_curve_sensitivity(self, 1.0, 0.0, provider)
    }
}

impl DiscountingMethod for CouponIborSpread {
    fn present_value(&self, provider: &MulticurveProvider) -> PricingResult<MultipleCurrencyAmount> {
        geared_present_value(self.coupon(), 1.0, self.spread(), provider)
    }

    fn present_value_curve_sensitivity(
        &self,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        geared_curve_sensitivity(self.coupon(), 1.0, self.spread(), provider)
    }
}

impl DiscountingMethod for CouponIborGearing {
    fn present_value(&self, provider: &MulticurveProvider) -> PricingResult<MultipleCurrencyAmount> {
        geared_present_value(self.coupon(), self.factor(), self.spread(), provider)
    }

    fn present_value_curve_sensitivity(
        &self,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        geared_curve_sensitivity(self.coupon(), self.factor(), self.spread(), provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::test_support::{check_against_bumps, fixing, provider, DSC, FWD};
    use approx::assert_relative_eq;
    use ratekit_core::Currency;

    fn coupon() -> CouponIbor {
        CouponIbor::new(Currency::USD, 1.75, 0.25, 1_000_000.0, fixing(1.5)).unwrap()
    }

    #[test]
    fn test_plain_coupon_present_value() {
        let provider = provider();
        let coupon = coupon();
        let forward = provider
            .forward_rate(coupon.index(), 1.5, 1.75, 0.25)
            .unwrap();
        let df = provider.discount_factor(Currency::USD, 1.75).unwrap();

        let pv = coupon.present_value(&provider).unwrap().amount(Currency::USD);
        assert_relative_eq!(pv, 1_000_000.0 * 0.25 * forward * df, epsilon = 1e-8);
    }

    #[test]
    fn test_plain_coupon_adjoint_entries() {
        let provider = provider();
        let coupon = coupon();
        let sens = coupon
            .present_value_curve_sensitivity(&provider)
            .unwrap()
            .sensitivity(Currency::USD);

        let df = provider.discount_factor(Currency::USD, 1.75).unwrap();
        let forward = sens.forward()[FWD][0];
        assert_relative_eq!(forward.value(), 250_000.0 * df, epsilon = 1e-8);
        assert_relative_eq!(forward.start(), 1.5);
        assert_eq!(sens.discounting()[DSC].len(), 1);

        check_against_bumps(&provider, &sens, |p| {
            coupon.present_value(p).unwrap().amount(Currency::USD)
        });
    }

    #[test]
    fn test_spread_and_gearing_adjoints() {
        let provider = provider();
        let spread = coupon().with_spread(0.0025);
        let sens = spread
            .present_value_curve_sensitivity(&provider)
            .unwrap()
            .sensitivity(Currency::USD);
        check_against_bumps(&provider, &sens, |p| {
            spread.present_value(p).unwrap().amount(Currency::USD)
        });

        let geared = CouponIborGearing::new(
            Currency::USD,
            1.75,
            0.25,
            -500_000.0,
            fixing(1.5),
            1.5,
            0.001,
        )
        .unwrap();
        let sens = geared
            .present_value_curve_sensitivity(&provider)
            .unwrap()
            .sensitivity(Currency::USD);
        check_against_bumps(&provider, &sens, |p| {
            geared.present_value(p).unwrap().amount(Currency::USD)
        });
    }

    #[test]
    fn test_missing_forward_curve_fails() {
        let provider = provider();
        let index = ratekit_core::IborIndex::new("USD LIBOR 6M", Currency::USD, 6);
        let fixing = ratekit_instruments::IborFixing::new(index, 1.0, 1.0, 1.5, 0.5).unwrap();
        let coupon = CouponIbor::new(Currency::USD, 1.5, 0.5, 1.0, fixing).unwrap();
        let err = coupon.present_value(&provider).unwrap_err();
        assert!(err.is_configuration());
    }
}
