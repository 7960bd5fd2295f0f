//! Payments and legs.

mod annuity;
mod compounding;
mod fixed;
mod ibor;

pub use annuity::Annuity;
pub use compounding::{CompoundingPeriod, CouponIborCompounding};
pub use fixed::{CouponFixed, PaymentFixed};
pub use ibor::{CouponIbor, CouponIborGearing, CouponIborSpread, IborFixing};

use ratekit_core::Currency;
use serde::{Deserialize, Serialize};

/// A single payment of a leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Payment {
    /// Known amount.
    Fixed(PaymentFixed),
    /// Fixed-rate coupon.
    CouponFixed(CouponFixed),
    /// Ibor coupon.
    CouponIbor(CouponIbor),
    /// Ibor coupon plus spread.
    CouponIborSpread(CouponIborSpread),
    /// Geared Ibor coupon plus spread.
    CouponIborGearing(CouponIborGearing),
    /// Compounded Ibor coupon.
    CouponIborCompounding(CouponIborCompounding),
}

impl Payment {
    /// Returns the payment currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            Self::Fixed(p) => p.currency(),
            Self::CouponFixed(c) => c.currency(),
            Self::CouponIbor(c) => c.currency(),
            Self::CouponIborSpread(c) => c.currency(),
            Self::CouponIborGearing(c) => c.currency(),
            Self::CouponIborCompounding(c) => c.currency(),
        }
    }

    /// Returns the payment time.
    #[must_use]
    pub fn payment_time(&self) -> f64 {
        match self {
            Self::Fixed(p) => p.payment_time(),
            Self::CouponFixed(c) => c.payment_time(),
            Self::CouponIbor(c) => c.payment_time(),
            Self::CouponIborSpread(c) => c.payment_time(),
            Self::CouponIborGearing(c) => c.payment_time(),
            Self::CouponIborCompounding(c) => c.payment_time(),
        }
    }

    /// Returns the reference amount: the amount for a fixed payment, the
    /// notional for a coupon.
    #[must_use]
    pub fn reference_amount(&self) -> f64 {
        match self {
            Self::Fixed(p) => p.amount(),
            Self::CouponFixed(c) => c.notional(),
            Self::CouponIbor(c) => c.notional(),
            Self::CouponIborSpread(c) => c.notional(),
            Self::CouponIborGearing(c) => c.notional(),
            Self::CouponIborCompounding(c) => c.notional(),
        }
    }

    /// Returns the variant name, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "PaymentFixed",
            Self::CouponFixed(_) => "CouponFixed",
            Self::CouponIbor(_) => "CouponIbor",
            Self::CouponIborSpread(_) => "CouponIborSpread",
            Self::CouponIborGearing(_) => "CouponIborGearing",
            Self::CouponIborCompounding(_) => "CouponIborCompounding",
        }
    }
}

impl From<PaymentFixed> for Payment {
    fn from(p: PaymentFixed) -> Self {
        Self::Fixed(p)
    }
}

impl From<CouponFixed> for Payment {
    fn from(c: CouponFixed) -> Self {
        Self::CouponFixed(c)
    }
}

impl From<CouponIbor> for Payment {
    fn from(c: CouponIbor) -> Self {
        Self::CouponIbor(c)
    }
}

impl From<CouponIborSpread> for Payment {
    fn from(c: CouponIborSpread) -> Self {
        Self::CouponIborSpread(c)
    }
}

impl From<CouponIborGearing> for Payment {
    fn from(c: CouponIborGearing) -> Self {
        Self::CouponIborGearing(c)
    }
}

impl From<CouponIborCompounding> for Payment {
    fn from(c: CouponIborCompounding) -> Self {
        Self::CouponIborCompounding(c)
    }
}
