use ratekit_instruments::{
    Cash, CouponFixed, CouponIbor, CouponIborCompounding, CouponIborGearing, CouponIborSpread,
    ForexForward, ForwardRateAgreement, InstrumentVisitor, InterestRateFuture, PaymentFixed,
};

use crate::error::{PricingError, PricingResult};

/// Last time at which an instrument pays or depends on a curve: the latest
/// payment time or fixing period end.
///
/// Calibration places one curve node at the last time of each instrument.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastTimeCalculator;

impl InstrumentVisitor for LastTimeCalculator {
    type Output = f64;
    type Error = PricingError;

    fn name(&self) -> &'static str {
        "LastTimeCalculator"
    }

    fn combine(&self, left: f64, right: f64) -> PricingResult<f64> {
        Ok(left.max(right))
    }

    fn visit_payment_fixed(&self, payment: &PaymentFixed, _: &()) -> PricingResult<f64> {
        Ok(payment.payment_time())
    }

    fn visit_coupon_fixed(&self, coupon: &CouponFixed, _: &()) -> PricingResult<f64> {
        Ok(coupon.payment_time())
    }

    fn visit_coupon_ibor(&self, coupon: &CouponIbor, _: &()) -> PricingResult<f64> {
        Ok(coupon.payment_time().max(coupon.fixing().end()))
    }

    fn visit_coupon_ibor_spread(&self, coupon: &CouponIborSpread, data: &()) -> PricingResult<f64> {
        self.visit_coupon_ibor(coupon.coupon(), data)
    }

    fn visit_coupon_ibor_gearing(&self, coupon: &CouponIborGearing, data: &()) -> PricingResult<f64> {
        self.visit_coupon_ibor(coupon.coupon(), data)
    }

    fn visit_coupon_ibor_compounding(&self, coupon: &CouponIborCompounding, _: &()) -> PricingResult<f64> {
        Ok(coupon
            .periods()
            .iter()
            .map(|p| p.fixing().end())
            .fold(coupon.payment_time(), f64::max))
    }

    fn visit_cash(&self, cash: &Cash, _: &()) -> PricingResult<f64> {
        Ok(cash.end_time())
    }

    fn visit_forward_rate_agreement(&self, fra: &ForwardRateAgreement, _: &()) -> PricingResult<f64> {
        Ok(fra.payment_time().max(fra.fixing().end()))
    }

    fn visit_interest_rate_future(&self, future: &InterestRateFuture, _: &()) -> PricingResult<f64> {
        Ok(future.fixing().end())
    }

    fn visit_forex_forward(&self, forward: &ForexForward, _: &()) -> PricingResult<f64> {
        Ok(forward
            .payment_one()
            .payment_time()
            .max(forward.payment_two().payment_time()))
    }
}
