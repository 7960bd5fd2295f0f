//! Margined interest rate futures.

use ratekit_core::{Currency, IborIndex};
use serde::{Deserialize, Serialize};

use crate::error::{check_finite, check_time, InstrumentError, InstrumentResult};
use crate::payments::IborFixing;

/// A daily-margined Ibor future.
///
/// The future price is `1 - L`; the value of a position is the margin
/// relative to the reference (trade or last settlement) price:
///
/// ```text
/// (price - reference_price) × notional × payment_accrual × quantity
/// ```
///
/// Margining is daily, so the value is not discounted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InterestRateFutureFields")]
pub struct InterestRateFuture {
    currency: Currency,
    last_trading_time: f64,
    fixing: IborFixing,
    reference_price: f64,
    notional: f64,
    payment_accrual: f64,
    quantity: f64,
}

impl InterestRateFuture {
    /// Creates a future position.
    pub fn new(
        currency: Currency,
        last_trading_time: f64,
        fixing: IborFixing,
        reference_price: f64,
        notional: f64,
        payment_accrual: f64,
        quantity: f64,
    ) -> InstrumentResult<Self> {
        Ok(Self {
            currency,
            last_trading_time: check_time("last trading time", last_trading_time)?,
            fixing,
            reference_price: check_finite("reference price", reference_price)?,
            notional: check_finite("notional", notional)?,
            payment_accrual: check_time("payment accrual", payment_accrual)?,
            quantity: check_finite("quantity", quantity)?,
        })
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the last trading time.
    pub fn last_trading_time(&self) -> f64 {
        self.last_trading_time
    }

    /// Returns the fixing.
    pub fn fixing(&self) -> &IborFixing {
        &self.fixing
    }

    /// Returns the index.
    pub fn index(&self) -> &IborIndex {
        self.fixing.index()
    }

    /// Returns the reference price.
    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    /// Returns the contract notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the accrual fraction used for margining.
    pub fn payment_accrual(&self) -> f64 {
        self.payment_accrual
    }

    /// Returns the number of contracts.
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Returns the same position with another reference price.
    #[must_use]
    pub fn with_reference_price(&self, reference_price: f64) -> Self {
        Self {
            reference_price,
            ..self.clone()
        }
    }
}

#[derive(Deserialize)]
struct InterestRateFutureFields {
    currency: Currency,
    last_trading_time: f64,
    fixing: IborFixing,
    reference_price: f64,
    notional: f64,
    payment_accrual: f64,
    quantity: f64,
}

impl TryFrom<InterestRateFutureFields> for InterestRateFuture {
    type Error = InstrumentError;

    fn try_from(f: InterestRateFutureFields) -> Result<Self, Self::Error> {
        Self::new(
            f.currency,
            f.last_trading_time,
            f.fixing,
            f.reference_price,
            f.notional,
            f.payment_accrual,
            f.quantity,
        )
    }
}
