//! Fixed payments and fixed coupons.

use ratekit_core::MultipleCurrencyAmount;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::{CouponFixed, PaymentFixed};

use super::{discounting_sensitivity, DiscountingMethod};
use crate::error::PricingResult;
use crate::sensitivity::MultipleCurrencyMulticurveSensitivity;

impl DiscountingMethod for PaymentFixed {
    fn present_value(&self, provider: &MulticurveProvider) -> PricingResult<MultipleCurrencyAmount> {
        let df = provider.discount_factor(self.currency(), self.payment_time())?;
        Ok(MultipleCurrencyAmount::of(self.currency(), self.amount() * df))
    }

    fn present_value_curve_sensitivity(
        &self,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        let df = provider.discount_factor(self.currency(), self.payment_time())?;
        // Backward sweep
        let pv_bar = 1.0;
        let df_bar = self.amount() * pv_bar;
        let sensitivity =
            discounting_sensitivity(provider, self.currency(), self.payment_time(), df, df_bar)?;
        Ok(MultipleCurrencyMulticurveSensitivity::of(self.currency(), sensitivity))
    }
}

impl DiscountingMethod for CouponFixed {
    fn present_value(&self, provider: &MulticurveProvider) -> PricingResult<MultipleCurrencyAmount> {
        self.to_payment_fixed().present_value(provider)
    }

    fn present_value_curve_sensitivity(
        &self,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity> {
        self.to_payment_fixed().present_value_curve_sensitivity(provider)
    }
}
