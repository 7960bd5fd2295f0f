//! Cash deposits.

use ratekit_core::Currency;
use serde::{Deserialize, Serialize};

use crate::error::{check_finite, check_time, InstrumentError, InstrumentResult};

/// A deposit: `notional` lent at `start_time`, repaid with simple interest
/// `notional × (1 + rate × accrual)` at `end_time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CashFields")]
pub struct Cash {
    currency: Currency,
    start_time: f64,
    end_time: f64,
    notional: f64,
    rate: f64,
    accrual: f64,
}

impl Cash {
    /// Creates a deposit.
    pub fn new(
        currency: Currency,
        start_time: f64,
        end_time: f64,
        notional: f64,
        rate: f64,
        accrual: f64,
    ) -> InstrumentResult<Self> {
        check_time("deposit start", start_time)?;
        check_time("deposit end", end_time)?;
        if end_time <= start_time {
            return Err(InstrumentError::invalid(format!(
                "deposit end {end_time} must be after start {start_time}"
            )));
        }
        if !(accrual.is_finite() && accrual > 0.0) {
            return Err(InstrumentError::invalid(format!(
                "deposit accrual must be positive, got {accrual}"
            )));
        }
        Ok(Self {
            currency,
            start_time,
            end_time,
            notional: check_finite("notional", notional)?,
            rate: check_finite("rate", rate)?,
            accrual,
        })
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the start time.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Returns the end (repayment) time.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Returns the notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the deposit rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the accrual fraction.
    pub fn accrual(&self) -> f64 {
        self.accrual
    }

    /// Returns the same deposit at another rate.
    #[must_use]
    pub fn with_rate(&self, rate: f64) -> Self {
        Self { rate, ..*self }
    }
}

#[derive(Deserialize)]
struct CashFields {
    currency: Currency,
    start_time: f64,
    end_time: f64,
    notional: f64,
    rate: f64,
    accrual: f64,
}

impl TryFrom<CashFields> for Cash {
    type Error = InstrumentError;

    fn try_from(f: CashFields) -> Result<Self, Self::Error> {
        Self::new(f.currency, f.start_time, f.end_time, f.notional, f.rate, f.accrual)
    }
}
