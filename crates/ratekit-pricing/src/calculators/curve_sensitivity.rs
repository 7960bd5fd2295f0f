use ratekit_curves::MulticurveProvider;
use ratekit_instruments::{
    Cash, CouponFixed, CouponIbor, CouponIborCompounding, CouponIborGearing, CouponIborSpread,
    ForexForward, ForwardRateAgreement, InstrumentVisitor, InterestRateFuture, PaymentFixed,
};

use crate::error::{PricingError, PricingResult};
use crate::methods::DiscountingMethod;
use crate::sensitivity::MultipleCurrencyMulticurveSensitivity;

/// Curve sensitivity of [`PresentValueCalculator`](super::PresentValueCalculator).
///
/// Each leaf runs the adjoint of its present value formula; composites
/// concatenate their children's sensitivities.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentValueCurveSensitivityCalculator;

impl InstrumentVisitor<MulticurveProvider> for PresentValueCurveSensitivityCalculator {
    type Output = MultipleCurrencyMulticurveSensitivity;
    type Error = PricingError;

    fn name(&self) -> &'static str {
        "PresentValueCurveSensitivityCalculator"
    }

    fn combine(&self, left: Self::Output, right: Self::Output) -> PricingResult<Self::Output> {
        Ok(left + right)
    }

    fn visit_payment_fixed(&self, payment: &PaymentFixed, provider: &MulticurveProvider) -> PricingResult<Self::Output> {
        payment.present_value_curve_sensitivity(provider)
    }

    fn visit_coupon_fixed(&self, coupon: &CouponFixed, provider: &MulticurveProvider) -> PricingResult<Self::Output> {
        coupon.present_value_curve_sensitivity(provider)
    }

    fn visit_coupon_ibor(&self, coupon: &CouponIbor, provider: &MulticurveProvider) -> PricingResult<Self::Output> {
        coupon.present_value_curve_sensitivity(provider)
    }

    fn visit_coupon_ibor_spread(
        &self,
        coupon: &CouponIborSpread,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        coupon.present_value_curve_sensitivity(provider)
    }

    fn visit_coupon_ibor_gearing(
        &self,
        coupon: &CouponIborGearing,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        coupon.present_value_curve_sensitivity(provider)
    }

    fn visit_coupon_ibor_compounding(
        &self,
        coupon: &CouponIborCompounding,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        coupon.present_value_curve_sensitivity(provider)
    }

    fn visit_cash(&self, cash: &Cash, provider: &MulticurveProvider) -> PricingResult<Self::Output> {
        cash.present_value_curve_sensitivity(provider)
    }

    fn visit_forward_rate_agreement(
        &self,
        fra: &ForwardRateAgreement,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        fra.present_value_curve_sensitivity(provider)
    }

    fn visit_interest_rate_future(
        &self,
        future: &InterestRateFuture,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        future.present_value_curve_sensitivity(provider)
    }

    fn visit_forex_forward(&self, forward: &ForexForward, provider: &MulticurveProvider) -> PricingResult<Self::Output> {
        forward.present_value_curve_sensitivity(provider)
    }
}
