use ratekit_core::Currency;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::{
    Cash, CouponFixed, CouponIbor, CouponIborCompounding, CouponIborGearing, CouponIborSpread,
    ForexForward, ForwardRateAgreement, InstrumentVisitor, InterestRateFuture, PaymentFixed,
};

use crate::error::{PricingError, PricingResult};
use crate::methods::{compounding, deposit, fra, future};

/// Sensitivity of the present value to the contractual coupon: the fixed
/// rate, the spread over the index, or the reference price of a future.
///
/// Payments without a coupon (fixed amounts, plain Ibor coupons) have zero
/// coupon sensitivity. Composites sum their children, so a swap reports the
/// sensitivity to a common shift of the coupons of both legs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentValueCouponSensitivityCalculator;

fn discounted_basis(
    notional: f64,
    accrual: f64,
    currency: Currency,
    payment_time: f64,
    provider: &MulticurveProvider,
) -> PricingResult<f64> {
    Ok(notional * accrual * provider.discount_factor(currency, payment_time)?)
}

impl InstrumentVisitor<MulticurveProvider> for PresentValueCouponSensitivityCalculator {
    type Output = f64;
    type Error = PricingError;

    fn name(&self) -> &'static str {
        "PresentValueCouponSensitivityCalculator"
    }

    fn combine(&self, left: f64, right: f64) -> PricingResult<f64> {
        Ok(left + right)
    }

    fn visit_payment_fixed(&self, _payment: &PaymentFixed, _provider: &MulticurveProvider) -> PricingResult<f64> {
        Ok(0.0)
    }

    fn visit_coupon_fixed(&self, coupon: &CouponFixed, provider: &MulticurveProvider) -> PricingResult<f64> {
        discounted_basis(
            coupon.notional(),
            coupon.payment_accrual(),
            coupon.currency(),
            coupon.payment_time(),
            provider,
        )
    }

    fn visit_coupon_ibor(&self, _coupon: &CouponIbor, _provider: &MulticurveProvider) -> PricingResult<f64> {
        Ok(0.0)
    }

    fn visit_coupon_ibor_spread(&self, coupon: &CouponIborSpread, provider: &MulticurveProvider) -> PricingResult<f64> {
        let inner = coupon.coupon();
        discounted_basis(
            inner.notional(),
            inner.payment_accrual(),
            inner.currency(),
            inner.payment_time(),
            provider,
        )
    }

    fn visit_coupon_ibor_gearing(&self, coupon: &CouponIborGearing, provider: &MulticurveProvider) -> PricingResult<f64> {
        let inner = coupon.coupon();
        discounted_basis(
            inner.notional(),
            inner.payment_accrual(),
            inner.currency(),
            inner.payment_time(),
            provider,
        )
    }

    fn visit_coupon_ibor_compounding(
        &self,
        coupon: &CouponIborCompounding,
        provider: &MulticurveProvider,
    ) -> PricingResult<f64> {
        compounding::spread_sensitivity(coupon, provider)
    }

    fn visit_cash(&self, cash: &Cash, provider: &MulticurveProvider) -> PricingResult<f64> {
        deposit::rate_sensitivity(cash, provider)
    }

    fn visit_forward_rate_agreement(&self, fra: &ForwardRateAgreement, provider: &MulticurveProvider) -> PricingResult<f64> {
        fra::rate_sensitivity(fra, provider)
    }

    fn visit_interest_rate_future(&self, future: &InterestRateFuture, _provider: &MulticurveProvider) -> PricingResult<f64> {
        Ok(future::reference_price_sensitivity(future))
    }

    fn visit_forex_forward(&self, _forward: &ForexForward, _provider: &MulticurveProvider) -> PricingResult<f64> {
        Err(PricingError::unsupported(self.name(), "ForexForward"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::PresentValueCalculator;
    use crate::methods::test_support::{fixing, provider};
    use approx::assert_relative_eq;
    use ratekit_instruments::{Annuity, InstrumentDerivative, Swap};

    fn swap(rate: f64) -> Swap {
        let fixed = Annuity::from_payments(
            (1..=3).map(|i| CouponFixed::new(Currency::USD, f64::from(i), 1.0, 1e6, rate).unwrap()),
        )
        .unwrap();
        let float = Annuity::from_payments((0..12).map(|i| {
            let start = 0.25 * f64::from(i);
            CouponIbor::new(Currency::USD, start + 0.25, 0.25, -1e6, fixing(start)).unwrap()
        }))
        .unwrap();
        Swap::new(fixed, float)
    }

    #[test]
    fn test_swap_coupon_sensitivity_is_fixed_leg_pvbp() {
        let provider = provider();
        let analytic = InstrumentDerivative::from(swap(0.02))
            .accept(&PresentValueCouponSensitivityCalculator, &provider)
            .unwrap();

        let h = 1e-6;
        let pv = |rate: f64| {
            PresentValueCalculator
                .visit_swap(&swap(rate), &provider)
                .unwrap()
                .amount(Currency::USD)
        };
        assert_relative_eq!(analytic, (pv(0.02 + h) - pv(0.02 - h)) / (2.0 * h), max_relative = 1e-6);
    }

    #[test]
    fn test_coupon_less_payments_have_zero_sensitivity() {
        let provider = provider();
        let payment = PaymentFixed::new(Currency::USD, 1.0, 100.0).unwrap();
        assert_eq!(
            PresentValueCouponSensitivityCalculator
                .visit_payment_fixed(&payment, &provider)
                .unwrap(),
            0.0
        );
    }
}
