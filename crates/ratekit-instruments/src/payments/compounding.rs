//! Compounded Ibor coupons.

use ratekit_core::{Currency, IborIndex};
use serde::{Deserialize, Serialize};

use super::IborFixing;
use crate::error::{check_finite, check_time, InstrumentError, InstrumentResult};

/// One sub-period of a compounded coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CompoundingPeriodFields")]
pub struct CompoundingPeriod {
    fixing: IborFixing,
    accrual: f64,
}

impl CompoundingPeriod {
    /// Creates a sub-period accruing `accrual` on `fixing`.
    pub fn new(fixing: IborFixing, accrual: f64) -> InstrumentResult<Self> {
        Ok(Self {
            fixing,
            accrual: check_time("sub-period accrual", accrual)?,
        })
    }

    /// Returns the fixing of the sub-period.
    pub fn fixing(&self) -> &IborFixing {
        &self.fixing
    }

    /// Returns the accrual fraction of the sub-period.
    pub fn accrual(&self) -> f64 {
        self.accrual
    }
}

/// A coupon compounding several Ibor sub-periods, paid once:
///
/// ```text
/// notional × (Π (1 + δ_i (L_i + spread)) - 1)
/// ```
///
/// All sub-periods fix on the same index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CouponIborCompoundingFields")]
pub struct CouponIborCompounding {
    currency: Currency,
    payment_time: f64,
    payment_accrual: f64,
    notional: f64,
    periods: Vec<CompoundingPeriod>,
    spread: f64,
}

impl CouponIborCompounding {
    /// Creates a compounded coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no sub-periods or they fix on different
    /// indices.
    pub fn new(
        currency: Currency,
        payment_time: f64,
        payment_accrual: f64,
        notional: f64,
        periods: Vec<CompoundingPeriod>,
        spread: f64,
    ) -> InstrumentResult<Self> {
        let first = periods.first().ok_or(InstrumentError::Empty {
            what: "compounded coupon periods",
        })?;
        let index = first.fixing.index();
        if let Some(other) = periods.iter().find(|p| p.fixing.index() != index) {
            return Err(InstrumentError::invalid(format!(
                "compounded coupon mixes indices {} and {}",
                index,
                other.fixing.index()
            )));
        }
        Ok(Self {
            currency,
            payment_time: check_time("payment time", payment_time)?,
            payment_accrual: check_time("payment accrual", payment_accrual)?,
            notional: check_finite("notional", notional)?,
            spread: check_finite("spread", spread)?,
            periods,
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

    /// Returns the total accrual fraction of the coupon.
    pub fn payment_accrual(&self) -> f64 {
        self.payment_accrual
    }

    /// Returns the notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the sub-periods.
    pub fn periods(&self) -> &[CompoundingPeriod] {
        &self.periods
    }

    /// Returns the spread added to each sub-period rate.
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Returns the index shared by every sub-period.
    pub fn index(&self) -> &IborIndex {
        // Construction guarantees at least one period
        self.periods[0].fixing.index()
    }
}

#[derive(Deserialize)]
struct CompoundingPeriodFields {
    fixing: IborFixing,
    accrual: f64,
}

impl TryFrom<CompoundingPeriodFields> for CompoundingPeriod {
    type Error = InstrumentError;

    fn try_from(f: CompoundingPeriodFields) -> Result<Self, Self::Error> {
        Self::new(f.fixing, f.accrual)
    }
}

#[derive(Deserialize)]
struct CouponIborCompoundingFields {
    currency: Currency,
    payment_time: f64,
    payment_accrual: f64,
    notional: f64,
    periods: Vec<CompoundingPeriod>,
    spread: f64,
}

impl TryFrom<CouponIborCompoundingFields> for CouponIborCompounding {
    type Error = InstrumentError;

    fn try_from(f: CouponIborCompoundingFields) -> Result<Self, Self::Error> {
        Self::new(
            f.currency,
            f.payment_time,
            f.payment_accrual,
            f.notional,
            f.periods,
            f.spread,
        )
    }
}
