use ratekit_curves::MulticurveProvider;
use ratekit_instruments::{
    Annuity, Cash, CouponFixed, CouponIbor, CouponIborCompounding, CouponIborGearing, CouponIborSpread,
    ForexForward, ForwardRateAgreement, InstrumentVisitor, InterestRateFuture, PaymentFixed, Swap,
    SwapMultileg,
};

use crate::error::{PricingError, PricingResult};
use crate::methods::{deposit, forex, forward_rate, forward_sensitivity, fra, future, swap};
use crate::sensitivity::MulticurveSensitivity;

/// Rate quote that makes an instrument worthless.
///
/// | Instrument | Par rate |
/// |------------|----------|
/// | [`Cash`] | deposit rate |
/// | [`ForwardRateAgreement`], Ibor coupons | forward rate of the fixing |
/// | [`InterestRateFuture`] | forward rate implied by the model price |
/// | [`ForexForward`] | forward FX rate |
/// | [`Swap`] | `-PV(second leg) / PVBP(fixed first leg)` |
///
/// A par rate does not add up across instruments, so legs, multi-leg swaps
/// and the remaining payments are unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParRateCalculator;

impl InstrumentVisitor<MulticurveProvider> for ParRateCalculator {
    type Output = f64;
    type Error = PricingError;

    fn name(&self) -> &'static str {
        "ParRateCalculator"
    }

    fn combine(&self, _left: f64, _right: f64) -> PricingResult<f64> {
        Err(PricingError::unsupported(self.name(), "composite instrument"))
    }

    fn visit_payment_fixed(&self, _payment: &PaymentFixed, _provider: &MulticurveProvider) -> PricingResult<f64> {
        Err(PricingError::unsupported(self.name(), "PaymentFixed"))
    }

    fn visit_coupon_fixed(&self, _coupon: &CouponFixed, _provider: &MulticurveProvider) -> PricingResult<f64> {
        Err(PricingError::unsupported(self.name(), "CouponFixed"))
    }

    fn visit_coupon_ibor(&self, coupon: &CouponIbor, provider: &MulticurveProvider) -> PricingResult<f64> {
        forward_rate(provider, coupon.fixing())
    }

    fn visit_coupon_ibor_spread(&self, coupon: &CouponIborSpread, provider: &MulticurveProvider) -> PricingResult<f64> {
        forward_rate(provider, coupon.coupon().fixing())
    }

    fn visit_coupon_ibor_gearing(&self, coupon: &CouponIborGearing, provider: &MulticurveProvider) -> PricingResult<f64> {
        forward_rate(provider, coupon.coupon().fixing())
    }

    fn visit_coupon_ibor_compounding(
        &self,
        _coupon: &CouponIborCompounding,
        _provider: &MulticurveProvider,
    ) -> PricingResult<f64> {
        Err(PricingError::unsupported(self.name(), "CouponIborCompounding"))
    }

    fn visit_cash(&self, cash: &Cash, provider: &MulticurveProvider) -> PricingResult<f64> {
        deposit::par_rate(cash, provider)
    }

    fn visit_forward_rate_agreement(&self, fra: &ForwardRateAgreement, provider: &MulticurveProvider) -> PricingResult<f64> {
        fra::par_rate(fra, provider)
    }

    fn visit_interest_rate_future(&self, future: &InterestRateFuture, provider: &MulticurveProvider) -> PricingResult<f64> {
        future::par_rate(future, provider)
    }

    fn visit_forex_forward(&self, forward: &ForexForward, provider: &MulticurveProvider) -> PricingResult<f64> {
        forex::forward_rate(forward, provider)
    }

    fn visit_annuity(&self, _annuity: &Annuity, _provider: &MulticurveProvider) -> PricingResult<f64> {
        Err(PricingError::unsupported(self.name(), "Annuity"))
    }

    fn visit_swap(&self, swap: &Swap, provider: &MulticurveProvider) -> PricingResult<f64> {
        swap::par_rate(swap, provider)
    }

    fn visit_swap_multileg(&self, _swap: &SwapMultileg, _provider: &MulticurveProvider) -> PricingResult<f64> {
        Err(PricingError::unsupported(self.name(), "SwapMultileg"))
    }
}

/// Curve sensitivity of [`ParRateCalculator`], instrument by instrument.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParRateCurveSensitivityCalculator;

type Sensitivity = PricingResult<MulticurveSensitivity>;

impl InstrumentVisitor<MulticurveProvider> for ParRateCurveSensitivityCalculator {
    type Output = MulticurveSensitivity;
    type Error = PricingError;

    fn name(&self) -> &'static str {
        "ParRateCurveSensitivityCalculator"
    }

    fn combine(&self, _left: Self::Output, _right: Self::Output) -> Sensitivity {
        Err(PricingError::unsupported(self.name(), "composite instrument"))
    }

    fn visit_payment_fixed(&self, _payment: &PaymentFixed, _provider: &MulticurveProvider) -> Sensitivity {
        Err(PricingError::unsupported(self.name(), "PaymentFixed"))
    }

    fn visit_coupon_fixed(&self, _coupon: &CouponFixed, _provider: &MulticurveProvider) -> Sensitivity {
        Err(PricingError::unsupported(self.name(), "CouponFixed"))
    }

    fn visit_coupon_ibor(&self, coupon: &CouponIbor, provider: &MulticurveProvider) -> Sensitivity {
        forward_sensitivity(provider, coupon.fixing(), 1.0)
    }

    fn visit_coupon_ibor_spread(&self, coupon: &CouponIborSpread, provider: &MulticurveProvider) -> Sensitivity {
        forward_sensitivity(provider, coupon.coupon().fixing(), 1.0)
    }

    fn visit_coupon_ibor_gearing(&self, coupon: &CouponIborGearing, provider: &MulticurveProvider) -> Sensitivity {
        forward_sensitivity(provider, coupon.coupon().fixing(), 1.0)
    }

    fn visit_coupon_ibor_compounding(
        &self,
        _coupon: &CouponIborCompounding,
        _provider: &MulticurveProvider,
    ) -> Sensitivity {
        Err(PricingError::unsupported(self.name(), "CouponIborCompounding"))
    }

    fn visit_cash(&self, cash: &Cash, provider: &MulticurveProvider) -> Sensitivity {
        deposit::par_rate_curve_sensitivity(cash, provider)
    }

    fn visit_forward_rate_agreement(&self, fra: &ForwardRateAgreement, provider: &MulticurveProvider) -> Sensitivity {
        fra::par_rate_curve_sensitivity(fra, provider)
    }

    fn visit_interest_rate_future(&self, future: &InterestRateFuture, provider: &MulticurveProvider) -> Sensitivity {
        future::par_rate_curve_sensitivity(future, provider)
    }

    fn visit_forex_forward(&self, forward: &ForexForward, provider: &MulticurveProvider) -> Sensitivity {
        forex::forward_rate_curve_sensitivity(forward, provider)
    }

    fn visit_annuity(&self, _annuity: &Annuity, _provider: &MulticurveProvider) -> Sensitivity {
        Err(PricingError::unsupported(self.name(), "Annuity"))
    }

    fn visit_swap(&self, swap: &Swap, provider: &MulticurveProvider) -> Sensitivity {
        swap::par_rate_curve_sensitivity(swap, provider)
    }

    fn visit_swap_multileg(&self, _swap: &SwapMultileg, _provider: &MulticurveProvider) -> Sensitivity {
        Err(PricingError::unsupported(self.name(), "SwapMultileg"))
    }
}
