use ratekit_curves::MulticurveProvider;
use ratekit_instruments::{
    Annuity, Cash, CouponFixed, CouponIbor, CouponIborCompounding, CouponIborGearing, CouponIborSpread,
    ForexForward, ForwardRateAgreement, InstrumentVisitor, InterestRateFuture, PaymentFixed, Swap,
    SwapMultileg,
};

use crate::error::{PricingError, PricingResult};
use crate::methods::{deposit, fra, future, swap};

/// Amount to add to the market quote of an instrument to make it
/// worthless.
///
/// - swaps: spread on the first leg, `-PV / PVBP(first leg)`
/// - deposits and FRAs: par rate minus contractual rate
/// - futures: model price minus reference price
#[derive(Debug, Clone, Copy, Default)]
pub struct ParSpreadMarketQuoteCalculator;

impl ParSpreadMarketQuoteCalculator {
    fn unsupported(&self, instrument: &'static str) -> PricingResult<f64> {
        Err(PricingError::unsupported(self.name(), instrument))
    }
}

impl InstrumentVisitor<MulticurveProvider> for ParSpreadMarketQuoteCalculator {
    type Output = f64;
    type Error = PricingError;

    fn name(&self) -> &'static str {
        "ParSpreadMarketQuoteCalculator"
    }

    fn combine(&self, _left: f64, _right: f64) -> PricingResult<f64> {
        self.unsupported("composite instrument")
    }

    fn visit_payment_fixed(&self, _: &PaymentFixed, _: &MulticurveProvider) -> PricingResult<f64> {
        self.unsupported("PaymentFixed")
    }

    fn visit_coupon_fixed(&self, _: &CouponFixed, _: &MulticurveProvider) -> PricingResult<f64> {
        self.unsupported("CouponFixed")
    }

    fn visit_coupon_ibor(&self, _: &CouponIbor, _: &MulticurveProvider) -> PricingResult<f64> {
        self.unsupported("CouponIbor")
    }

    fn visit_coupon_ibor_spread(&self, _: &CouponIborSpread, _: &MulticurveProvider) -> PricingResult<f64> {
        self.unsupported("CouponIborSpread")
    }

    fn visit_coupon_ibor_gearing(&self, _: &CouponIborGearing, _: &MulticurveProvider) -> PricingResult<f64> {
        self.unsupported("CouponIborGearing")
    }

    fn visit_coupon_ibor_compounding(
        &self,
        _: &CouponIborCompounding,
        _: &MulticurveProvider,
    ) -> PricingResult<f64> {
        self.unsupported("CouponIborCompounding")
    }

    fn visit_cash(&self, cash: &Cash, provider: &MulticurveProvider) -> PricingResult<f64> {
        Ok(deposit::par_rate(cash, provider)? - cash.rate())
    }

    fn visit_forward_rate_agreement(&self, fra: &ForwardRateAgreement, provider: &MulticurveProvider) -> PricingResult<f64> {
        Ok(fra::par_rate(fra, provider)? - fra.rate())
    }

    fn visit_interest_rate_future(&self, future: &InterestRateFuture, provider: &MulticurveProvider) -> PricingResult<f64> {
        Ok(future::price(future, provider)? - future.reference_price())
    }

    fn visit_forex_forward(&self, _: &ForexForward, _: &MulticurveProvider) -> PricingResult<f64> {
        self.unsupported("ForexForward")
    }

    fn visit_annuity(&self, _: &Annuity, _: &MulticurveProvider) -> PricingResult<f64> {
        self.unsupported("Annuity")
    }

    fn visit_swap(&self, swap: &Swap, provider: &MulticurveProvider) -> PricingResult<f64> {
        swap::par_spread(swap, provider)
    }

    fn visit_swap_multileg(&self, _: &SwapMultileg, _: &MulticurveProvider) -> PricingResult<f64> {
        self.unsupported("SwapMultileg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::PresentValueCalculator;
    use crate::methods::test_support::{fixing, provider};
    use approx::assert_relative_eq;
    use ratekit_core::Currency;

    #[test]
    fn test_quote_plus_spread_is_par() {
        let provider = provider();
        let calc = ParSpreadMarketQuoteCalculator;

        let cash = Cash::new(Currency::USD, 0.0, 1.0, 1e6, 0.01, 1.0).unwrap();
        let spread = calc.visit_cash(&cash, &provider).unwrap();
        let pv = PresentValueCalculator
            .visit_cash(&cash.with_rate(0.01 + spread), &provider)
            .unwrap();
        assert_relative_eq!(pv.amount(Currency::USD), 0.0, epsilon = 1e-8);

        let fra = ForwardRateAgreement::new(Currency::USD, 0.5, 0.25, 1e6, fixing(0.5), 0.02).unwrap();
        let spread = calc.visit_forward_rate_agreement(&fra, &provider).unwrap();
        let pv = PresentValueCalculator
            .visit_forward_rate_agreement(&fra.with_rate(0.02 + spread), &provider)
            .unwrap();
        assert_relative_eq!(pv.amount(Currency::USD), 0.0, epsilon = 1e-8);

        let future = InterestRateFuture::new(Currency::USD, 0.5, fixing(0.5), 0.98, 1e6, 0.25, 1.0).unwrap();
        let spread = calc.visit_interest_rate_future(&future, &provider).unwrap();
        let pv = PresentValueCalculator
            .visit_interest_rate_future(&future.with_reference_price(0.98 + spread), &provider)
            .unwrap();
        assert_relative_eq!(pv.amount(Currency::USD), 0.0, epsilon = 1e-8);
    }
}
