//! Fixed payments and fixed-rate coupons.

use ratekit_core::Currency;
use serde::{Deserialize, Serialize};

use crate::error::{check_finite, check_time, InstrumentError, InstrumentResult};

/// A known amount paid at a given time.
///
/// The sign of the amount gives the direction: positive is received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PaymentFixedFields")]
pub struct PaymentFixed {
    currency: Currency,
    payment_time: f64,
    amount: f64,
}

impl PaymentFixed {
    /// Creates a fixed payment.
    pub fn new(currency: Currency, payment_time: f64, amount: f64) -> InstrumentResult<Self> {
        Ok(Self {
            currency,
            payment_time: check_time("payment time", payment_time)?,
            amount: check_finite("amount", amount)?,
        })
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the payment time.
    pub fn payment_time(&self) -> f64 {
        self.payment_time
    }

    /// Returns the amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

/// A coupon paying `notional × accrual × fixed_rate` at the payment time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CouponFixedFields")]
pub struct CouponFixed {
    currency: Currency,
    payment_time: f64,
    payment_accrual: f64,
    notional: f64,
    fixed_rate: f64,
}

impl CouponFixed {
    /// Creates a fixed coupon.
    pub fn new(
        currency: Currency,
        payment_time: f64,
        payment_accrual: f64,
        notional: f64,
        fixed_rate: f64,
    ) -> InstrumentResult<Self> {
        Ok(Self {
            currency,
            payment_time: check_time("payment time", payment_time)?,
            payment_accrual: check_time("payment accrual", payment_accrual)?,
            notional: check_finite("notional", notional)?,
            fixed_rate: check_finite("fixed rate", fixed_rate)?,
        })
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the payment time.
    pub fn payment_time(&self) -> f64 {
        self.payment_time
    }

    /// Returns the accrual fraction of the coupon.
    pub fn payment_accrual(&self) -> f64 {
        self.payment_accrual
    }

    /// Returns the notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the fixed rate.
    pub fn fixed_rate(&self) -> f64 {
        self.fixed_rate
    }

    /// Returns the paid amount `notional × accrual × rate`.
    pub fn amount(&self) -> f64 {
        self.notional * self.payment_accrual * self.fixed_rate
    }

    /// Returns the same coupon with another rate.
    #[must_use]
    pub fn with_rate(&self, fixed_rate: f64) -> Self {
        Self { fixed_rate, ..*self }
    }

    /// Returns the same coupon with another notional.
    #[must_use]
    pub fn with_notional(&self, notional: f64) -> Self {
        Self { notional, ..*self }
    }

    /// Converts to the equivalent fixed payment.
    pub fn to_payment_fixed(&self) -> PaymentFixed {
        PaymentFixed {
            currency: self.currency,
            payment_time: self.payment_time,
            amount: self.amount(),
        }
    }
}

#[derive(Deserialize)]
struct PaymentFixedFields {
    currency: Currency,
    payment_time: f64,
    amount: f64,
}

impl TryFrom<PaymentFixedFields> for PaymentFixed {
    type Error = InstrumentError;

    fn try_from(f: PaymentFixedFields) -> Result<Self, Self::Error> {
        Self::new(f.currency, f.payment_time, f.amount)
    }
}

#[derive(Deserialize)]
struct CouponFixedFields {
    currency: Currency,
    payment_time: f64,
    payment_accrual: f64,
    notional: f64,
    fixed_rate: f64,
}

impl TryFrom<CouponFixedFields> for CouponFixed {
    type Error = InstrumentError;

    fn try_from(f: CouponFixedFields) -> Result<Self, Self::Error> {
        Self::new(f.currency, f.payment_time, f.payment_accrual, f.notional, f.fixed_rate)
    }
}
