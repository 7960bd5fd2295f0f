//! Exhaustive dispatch from instruments to calculators.
//!
//! A calculator is a value implementing [`InstrumentVisitor`] for a context
//! type `D`: the market data it needs, or `()` when it needs none. Leaf
//! methods are required, so every calculator states explicitly what it
//! does for every instrument, including failing with an error for the ones
//! it does not support. Composite instruments recurse depth-first and fold
//! child results with [`InstrumentVisitor::combine`].
//!
//! Calculators are stateless or carry only configuration; they are built
//! once and passed by reference.

use crate::derivative::InstrumentDerivative;
use crate::error::InstrumentError;
use crate::payments::{
    Annuity, CouponFixed, CouponIbor, CouponIborCompounding, CouponIborGearing, CouponIborSpread,
    Payment, PaymentFixed,
};
use crate::products::{Cash, ForexForward, ForwardRateAgreement, InterestRateFuture};
use crate::swap::{Swap, SwapMultileg};

/// A calculation over instruments with context `D`.
///
/// # Example
///
/// ```rust
/// use ratekit_core::Currency;
/// use ratekit_instruments::prelude::*;
///
/// /// Counts leaf payments; needs no market data.
/// struct PaymentCounter;
///
/// impl InstrumentVisitor for PaymentCounter {
///     type Output = usize;
///     type Error = InstrumentError;
///
///     fn name(&self) -> &'static str { "PaymentCounter" }
///     fn combine(&self, a: usize, b: usize) -> Result<usize, InstrumentError> { Ok(a + b) }
///
///     fn visit_payment_fixed(&self, _: &PaymentFixed, _: &()) -> Result<usize, InstrumentError> { Ok(1) }
///     fn visit_coupon_fixed(&self, _: &CouponFixed, _: &()) -> Result<usize, InstrumentError> { Ok(1) }
///     fn visit_coupon_ibor(&self, _: &CouponIbor, _: &()) -> Result<usize, InstrumentError> { Ok(1) }
///     fn visit_coupon_ibor_spread(&self, _: &CouponIborSpread, _: &()) -> Result<usize, InstrumentError> { Ok(1) }
///     fn visit_coupon_ibor_gearing(&self, _: &CouponIborGearing, _: &()) -> Result<usize, InstrumentError> { Ok(1) }
///     fn visit_coupon_ibor_compounding(&self, c: &CouponIborCompounding, _: &()) -> Result<usize, InstrumentError> { Ok(1) }
///     fn visit_cash(&self, _: &Cash, _: &()) -> Result<usize, InstrumentError> { Ok(2) }
///     fn visit_forward_rate_agreement(&self, _: &ForwardRateAgreement, _: &()) -> Result<usize, InstrumentError> { Ok(1) }
///     fn visit_interest_rate_future(&self, _: &InterestRateFuture, _: &()) -> Result<usize, InstrumentError> { Ok(0) }
///     fn visit_forex_forward(&self, _: &ForexForward, _: &()) -> Result<usize, InstrumentError> { Ok(2) }
/// }
///
/// let leg = Annuity::from_payments(
///     (1..=4).map(|i| CouponFixed::new(Currency::USD, f64::from(i), 1.0, 100.0, 0.03).unwrap()),
/// ).unwrap();
/// let swap = InstrumentDerivative::from(Swap::new(leg.clone(), leg));
/// assert_eq!(swap.accept(&PaymentCounter, &()).unwrap(), 8);
/// ```
pub trait InstrumentVisitor<D: ?Sized = ()> {
    /// Result of visiting one instrument.
    type Output;
    /// Error raised by the calculator.
    type Error: From<InstrumentError>;

    /// Calculator name, used in error messages.
    fn name(&self) -> &'static str;

    /// Combines the results of two sibling instruments.
    fn combine(&self, left: Self::Output, right: Self::Output) -> Result<Self::Output, Self::Error>;

    // ==================== Leaves ====================

    /// Visits a fixed payment.
    fn visit_payment_fixed(&self, payment: &PaymentFixed, data: &D) -> Result<Self::Output, Self::Error>;

    /// Visits a fixed coupon.
    fn visit_coupon_fixed(&self, coupon: &CouponFixed, data: &D) -> Result<Self::Output, Self::Error>;

    /// Visits an Ibor coupon.
    fn visit_coupon_ibor(&self, coupon: &CouponIbor, data: &D) -> Result<Self::Output, Self::Error>;

    /// Visits an Ibor coupon with spread.
    fn visit_coupon_ibor_spread(
        &self,
        coupon: &CouponIborSpread,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits a geared Ibor coupon.
    fn visit_coupon_ibor_gearing(
        &self,
        coupon: &CouponIborGearing,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits a compounded Ibor coupon.
    fn visit_coupon_ibor_compounding(
        &self,
        coupon: &CouponIborCompounding,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits a deposit.
    fn visit_cash(&self, cash: &Cash, data: &D) -> Result<Self::Output, Self::Error>;

    /// Visits a FRA.
    fn visit_forward_rate_agreement(
        &self,
        fra: &ForwardRateAgreement,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits a margined future.
    fn visit_interest_rate_future(
        &self,
        future: &InterestRateFuture,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits an FX forward.
    fn visit_forex_forward(&self, forward: &ForexForward, data: &D) -> Result<Self::Output, Self::Error>;

    // ==================== Composites ====================

    /// Visits a leg: every payment, combined in order.
    fn visit_annuity(&self, annuity: &Annuity, data: &D) -> Result<Self::Output, Self::Error> {
        fold_children(
            self,
            annuity.payments().iter().map(|p| self.visit_payment(p, data)),
            "annuity",
        )
    }

    /// Visits a swap: first leg combined with second leg.
    fn visit_swap(&self, swap: &Swap, data: &D) -> Result<Self::Output, Self::Error> {
        let first = self.visit_annuity(swap.first_leg(), data)?;
        let second = self.visit_annuity(swap.second_leg(), data)?;
        self.combine(first, second)
    }

    /// Visits a multi-leg swap: every leg, combined in order.
    fn visit_swap_multileg(&self, swap: &SwapMultileg, data: &D) -> Result<Self::Output, Self::Error> {
        fold_children(
            self,
            swap.legs().iter().map(|leg| self.visit_annuity(leg, data)),
            "multi-leg swap",
        )
    }

    // ==================== Dispatch ====================

    /// Routes a payment to its leaf method.
    fn visit_payment(&self, payment: &Payment, data: &D) -> Result<Self::Output, Self::Error> {
        match payment {
            Payment::Fixed(p) => self.visit_payment_fixed(p, data),
            Payment::CouponFixed(c) => self.visit_coupon_fixed(c, data),
            Payment::CouponIbor(c) => self.visit_coupon_ibor(c, data),
            Payment::CouponIborSpread(c) => self.visit_coupon_ibor_spread(c, data),
            Payment::CouponIborGearing(c) => self.visit_coupon_ibor_gearing(c, data),
            Payment::CouponIborCompounding(c) => self.visit_coupon_ibor_compounding(c, data),
        }
    }

    /// Routes any instrument to its method.
    fn visit(&self, derivative: &InstrumentDerivative, data: &D) -> Result<Self::Output, Self::Error> {
        match derivative {
            InstrumentDerivative::Payment(p) => self.visit_payment(p, data),
            InstrumentDerivative::Annuity(a) => self.visit_annuity(a, data),
            InstrumentDerivative::Swap(s) => self.visit_swap(s, data),
            InstrumentDerivative::SwapMultileg(s) => self.visit_swap_multileg(s, data),
            InstrumentDerivative::Cash(c) => self.visit_cash(c, data),
            InstrumentDerivative::ForwardRateAgreement(f) => self.visit_forward_rate_agreement(f, data),
            InstrumentDerivative::InterestRateFuture(f) => self.visit_interest_rate_future(f, data),
            InstrumentDerivative::ForexForward(f) => self.visit_forex_forward(f, data),
        }
    }
}

/// Folds child results left to right with the visitor's `combine`.
fn fold_children<V, D, I>(visitor: &V, children: I, what: &'static str) -> Result<V::Output, V::Error>
where
    V: InstrumentVisitor<D> + ?Sized,
    D: ?Sized,
    I: Iterator<Item = Result<V::Output, V::Error>>,
{
    let mut acc = None;
    for child in children {
        let value = child?;
        acc = Some(match acc {
            None => value,
            Some(previous) => visitor.combine(previous, value)?,
        });
    }
    acc.ok_or_else(|| InstrumentError::Empty { what }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratekit_core::{Currency, IborIndex};

    use crate::payments::IborFixing;

    /// Collects the payment times of fixed payments; rejects everything else.
    struct FixedTimes;

    type Times = Result<Vec<f64>, InstrumentError>;

    fn unsupported(what: &str) -> Times {
        Err(InstrumentError::invalid(format!("FixedTimes does not support {what}")))
    }

    impl InstrumentVisitor<str> for FixedTimes {
        type Output = Vec<f64>;
        type Error = InstrumentError;

        fn name(&self) -> &'static str {
            "FixedTimes"
        }

        fn combine(&self, mut left: Vec<f64>, right: Vec<f64>) -> Times {
            left.extend(right);
            Ok(left)
        }

        fn visit_payment_fixed(&self, p: &PaymentFixed, _: &str) -> Times {
            Ok(vec![p.payment_time()])
        }
        fn visit_coupon_fixed(&self, c: &CouponFixed, _: &str) -> Times {
            Ok(vec![c.payment_time()])
        }
        fn visit_coupon_ibor(&self, _: &CouponIbor, _: &str) -> Times {
            unsupported("CouponIbor")
        }
        fn visit_coupon_ibor_spread(&self, _: &CouponIborSpread, _: &str) -> Times {
            unsupported("CouponIborSpread")
        }
        fn visit_coupon_ibor_gearing(&self, _: &CouponIborGearing, _: &str) -> Times {
            unsupported("CouponIborGearing")
        }
        fn visit_coupon_ibor_compounding(&self, _: &CouponIborCompounding, _: &str) -> Times {
            unsupported("CouponIborCompounding")
        }
        fn visit_cash(&self, _: &Cash, _: &str) -> Times {
            unsupported("Cash")
        }
        fn visit_forward_rate_agreement(&self, _: &ForwardRateAgreement, _: &str) -> Times {
            unsupported("ForwardRateAgreement")
        }
        fn visit_interest_rate_future(&self, _: &InterestRateFuture, _: &str) -> Times {
            unsupported("InterestRateFuture")
        }
        fn visit_forex_forward(&self, _: &ForexForward, _: &str) -> Times {
            unsupported("ForexForward")
        }
    }

    fn fixed_leg(times: &[f64]) -> Annuity {
        Annuity::from_payments(
            times
                .iter()
                .map(|t| CouponFixed::new(Currency::USD, *t, 1.0, 1.0, 0.01).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_composites_recurse_depth_first_in_order() {
        let swap = Swap::new(fixed_leg(&[1.0, 2.0]), fixed_leg(&[0.5, 1.5]));
        let times = InstrumentDerivative::from(swap).accept(&FixedTimes, "ctx").unwrap();
        assert_eq!(times, vec![1.0, 2.0, 0.5, 1.5]);

        let multileg =
            SwapMultileg::new(vec![fixed_leg(&[3.0]), fixed_leg(&[1.0]), fixed_leg(&[2.0])]).unwrap();
        let times = InstrumentDerivative::from(multileg)
            .accept(&FixedTimes, "ctx")
            .unwrap();
        assert_eq!(times, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_unsupported_leaf_fails_loudly() {
        let index = IborIndex::new("USD LIBOR 3M", Currency::USD, 3);
        let fixing = IborFixing::new(index, 0.0, 0.0, 0.25, 0.25).unwrap();
        let coupon = CouponIbor::new(Currency::USD, 0.25, 0.25, 1.0, fixing).unwrap();
        let leg = Annuity::from_payments(vec![
            Payment::from(CouponFixed::new(Currency::USD, 0.25, 0.25, 1.0, 0.01).unwrap()),
            Payment::from(coupon),
        ])
        .unwrap();

        let err = InstrumentDerivative::from(leg)
            .accept(&FixedTimes, "ctx")
            .unwrap_err();
        assert!(err.to_string().contains("CouponIbor"));
    }
}
