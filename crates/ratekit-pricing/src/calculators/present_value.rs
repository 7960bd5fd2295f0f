use ratekit_core::MultipleCurrencyAmount;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::{
    Cash, CouponFixed, CouponIbor, CouponIborCompounding, CouponIborGearing, CouponIborSpread,
    ForexForward, ForwardRateAgreement, InstrumentVisitor, InterestRateFuture, PaymentFixed,
};

use crate::error::{PricingError, PricingResult};
use crate::methods::DiscountingMethod;

/// Present value by discounting, per currency.
///
/// Composites sum their children.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentValueCalculator;

impl InstrumentVisitor<MulticurveProvider> for PresentValueCalculator {
    type Output = MultipleCurrencyAmount;
    type Error = PricingError;

    fn name(&self) -> &'static str {
        "PresentValueCalculator"
    }

    fn combine(&self, left: Self::Output, right: Self::Output) -> PricingResult<Self::Output> {
        Ok(left + right)
    }

    fn visit_payment_fixed(&self, payment: &PaymentFixed, provider: &MulticurveProvider) -> PricingResult<Self::Output> {
        payment.present_value(provider)
    }

    fn visit_coupon_fixed(&self, coupon: &CouponFixed, provider: &MulticurveProvider) -> PricingResult<Self::Output> {
        coupon.present_value(provider)
    }

    fn visit_coupon_ibor(&self, coupon: &CouponIbor, provider: &MulticurveProvider) -> PricingResult<Self::Output> {
        coupon.present_value(provider)
    }

    fn visit_coupon_ibor_spread(
        &self,
        coupon: &CouponIborSpread,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        coupon.present_value(provider)
    }

    fn visit_coupon_ibor_gearing(
        &self,
        coupon: &CouponIborGearing,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        coupon.present_value(provider)
    }

    fn visit_coupon_ibor_compounding(
        &self,
        coupon: &CouponIborCompounding,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        coupon.present_value(provider)
    }

    fn visit_cash(&self, cash: &Cash, provider: &MulticurveProvider) -> PricingResult<Self::Output> {
        cash.present_value(provider)
    }

    fn visit_forward_rate_agreement(
        &self,
        fra: &ForwardRateAgreement,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        fra.present_value(provider)
    }

    fn visit_interest_rate_future(
        &self,
        future: &InterestRateFuture,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        future.present_value(provider)
    }

    fn visit_forex_forward(&self, forward: &ForexForward, provider: &MulticurveProvider) -> PricingResult<Self::Output> {
        forward.present_value(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::test_support::{fixing, provider};
    use approx::assert_relative_eq;
    use ratekit_core::Currency;
    use ratekit_instruments::{Annuity, InstrumentDerivative, Swap};

    #[test]
    fn test_swap_is_sum_of_legs() {
        let provider = provider();
        let fixed = Annuity::from_payments(
            (1..=3).map(|i| CouponFixed::new(Currency::USD, f64::from(i), 1.0, 1e6, 0.02).unwrap()),
        )
        .unwrap();
        let float = Annuity::from_payments((0..12).map(|i| {
            let start = 0.25 * f64::from(i);
            CouponIbor::new(Currency::USD, start + 0.25, 0.25, -1e6, fixing(start)).unwrap()
        }))
        .unwrap();

        let calc = PresentValueCalculator;
        let pv_fixed = calc.visit_annuity(&fixed, &provider).unwrap();
        let pv_float = calc.visit_annuity(&float, &provider).unwrap();
        let pv_swap = InstrumentDerivative::from(Swap::new(fixed, float))
            .accept(&calc, &provider)
            .unwrap();

        assert_relative_eq!(
            pv_swap.amount(Currency::USD),
            pv_fixed.amount(Currency::USD) + pv_float.amount(Currency::USD),
            epsilon = 1e-8
        );
    }
}
