//! The closed set of instruments understood by every calculator.

use std::collections::BTreeSet;

use ratekit_core::Currency;
use serde::{Deserialize, Serialize};

use crate::payments::{Annuity, Payment};
use crate::products::{Cash, ForexForward, ForwardRateAgreement, InterestRateFuture};
use crate::swap::{Swap, SwapMultileg};
use crate::visitor::InstrumentVisitor;

/// Any instrument: a payment, a composite of payments, or a product.
///
/// Instrument trees are immutable once built and are shared read-only by
/// every calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum InstrumentDerivative {
    /// A single payment.
    Payment(Payment),
    /// A leg.
    Annuity(Annuity),
    /// A two-leg swap.
    Swap(Swap),
    /// A multi-leg swap.
    SwapMultileg(SwapMultileg),
    /// A deposit.
    Cash(Cash),
    /// A forward rate agreement.
    ForwardRateAgreement(ForwardRateAgreement),
    /// A margined interest rate future.
    InterestRateFuture(InterestRateFuture),
    /// An FX forward.
    ForexForward(ForexForward),
}

impl InstrumentDerivative {
    /// Dispatches to the visitor method registered for this variant.
    pub fn accept<V, D>(&self, visitor: &V, data: &D) -> Result<V::Output, V::Error>
    where
        V: InstrumentVisitor<D> + ?Sized,
        D: ?Sized,
    {
        visitor.visit(self, data)
    }

    /// Returns the variant name, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Payment(p) => p.type_name(),
            Self::Annuity(_) => "Annuity",
            Self::Swap(_) => "Swap",
            Self::SwapMultileg(_) => "SwapMultileg",
            Self::Cash(_) => "Cash",
            Self::ForwardRateAgreement(_) => "ForwardRateAgreement",
            Self::InterestRateFuture(_) => "InterestRateFuture",
            Self::ForexForward(_) => "ForexForward",
        }
    }

    /// Returns every currency the instrument pays in.
    #[must_use]
    pub fn currencies(&self) -> BTreeSet<Currency> {
        match self {
            Self::Payment(p) => BTreeSet::from([p.currency()]),
            Self::Annuity(a) => BTreeSet::from([a.currency()]),
            Self::Swap(s) => BTreeSet::from([s.first_leg().currency(), s.second_leg().currency()]),
            Self::SwapMultileg(s) => s.currencies(),
            Self::Cash(c) => BTreeSet::from([c.currency()]),
            Self::ForwardRateAgreement(f) => BTreeSet::from([f.currency()]),
            Self::InterestRateFuture(f) => BTreeSet::from([f.currency()]),
            Self::ForexForward(f) => {
                let (one, two) = f.currencies();
                BTreeSet::from([one, two])
            }
        }
    }
}

macro_rules! impl_from_for_derivative {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for InstrumentDerivative {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_derivative! {
    Payment => Payment,
    Annuity => Annuity,
    Swap => Swap,
    SwapMultileg => SwapMultileg,
    Cash => Cash,
    ForwardRateAgreement => ForwardRateAgreement,
    InterestRateFuture => InterestRateFuture,
    ForexForward => ForexForward,
}

macro_rules! impl_payment_into_derivative {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for InstrumentDerivative {
                fn from(value: $ty) -> Self {
                    Self::Payment(Payment::from(value))
                }
            }
        )*
    };
}

impl_payment_into_derivative!(
    crate::payments::PaymentFixed,
    crate::payments::CouponFixed,
    crate::payments::CouponIbor,
    crate::payments::CouponIborSpread,
    crate::payments::CouponIborGearing,
    crate::payments::CouponIborCompounding,
);
