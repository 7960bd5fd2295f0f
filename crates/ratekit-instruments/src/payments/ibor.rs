//! Coupons paying an Ibor fixing.

use ratekit_core::{Currency, IborIndex};
use serde::{Deserialize, Serialize};

use crate::error::{check_finite, check_time, InstrumentError, InstrumentResult};

/// The fixing of an Ibor index over a forward period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IborFixingFields")]
pub struct IborFixing {
    index: IborIndex,
    fixing_time: f64,
    start: f64,
    end: f64,
    accrual: f64,
}

impl IborFixing {
    /// Creates a fixing of `index` at `fixing_time` for the period
    /// `[start, end]` with the index accrual fraction `accrual`.
    ///
    /// # Errors
    ///
    /// Returns an error for negative times, `end <= start` or a
    /// non-positive accrual.
    pub fn new(
        index: IborIndex,
        fixing_time: f64,
        start: f64,
        end: f64,
        accrual: f64,
    ) -> InstrumentResult<Self> {
        check_time("fixing time", fixing_time)?;
        check_time("fixing period start", start)?;
        check_time("fixing period end", end)?;
        if end <= start {
            return Err(InstrumentError::invalid(format!(
                "fixing period end {end} must be after start {start}"
            )));
        }
        if !(accrual.is_finite() && accrual > 0.0) {
            return Err(InstrumentError::invalid(format!(
                "fixing accrual must be positive, got {accrual}"
            )));
        }
        Ok(Self {
            index,
            fixing_time,
            start,
            end,
            accrual,
        })
    }

    /// Returns the index.
    pub fn index(&self) -> &IborIndex {
        &self.index
    }

    /// Returns the fixing time.
    pub fn fixing_time(&self) -> f64 {
        self.fixing_time
    }

    /// Returns the start of the fixing period.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Returns the end of the fixing period.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Returns the accrual fraction of the fixing period.
    pub fn accrual(&self) -> f64 {
        self.accrual
    }
}

/// A coupon paying `notional × accrual × L` where `L` is an Ibor fixing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CouponIborFields")]
pub struct CouponIbor {
    currency: Currency,
    payment_time: f64,
    payment_accrual: f64,
    notional: f64,
    fixing: IborFixing,
}

impl CouponIbor {
    /// Creates an Ibor coupon.
    pub fn new(
        currency: Currency,
        payment_time: f64,
        payment_accrual: f64,
        notional: f64,
        fixing: IborFixing,
    ) -> InstrumentResult<Self> {
        Ok(Self {
            currency,
            payment_time: check_time("payment time", payment_time)?,
            payment_accrual: check_time("payment accrual", payment_accrual)?,
            notional: check_finite("notional", notional)?,
            fixing,
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

    /// Returns the fixing.
    pub fn fixing(&self) -> &IborFixing {
        &self.fixing
    }

    /// Returns the index.
    pub fn index(&self) -> &IborIndex {
        self.fixing.index()
    }

    /// Adds a spread, giving a [`CouponIborSpread`].
    #[must_use]
    pub fn with_spread(&self, spread: f64) -> CouponIborSpread {
        CouponIborSpread {
            coupon: self.clone(),
            spread,
        }
    }
}

/// A coupon paying `notional × accrual × (L + spread)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CouponIborSpreadFields")]
pub struct CouponIborSpread {
    coupon: CouponIbor,
    spread: f64,
}

impl CouponIborSpread {
    /// Creates an Ibor coupon with spread.
    pub fn new(
        currency: Currency,
        payment_time: f64,
        payment_accrual: f64,
        notional: f64,
        fixing: IborFixing,
        spread: f64,
    ) -> InstrumentResult<Self> {
        Ok(Self {
            coupon: CouponIbor::new(currency, payment_time, payment_accrual, notional, fixing)?,
            spread: check_finite("spread", spread)?,
        })
    }

    /// Returns the underlying Ibor coupon without spread.
    pub fn coupon(&self) -> &CouponIbor {
        &self.coupon
    }

    /// Returns the spread.
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Returns the fixed amount paid by the spread, `notional × accrual × spread`.
    pub fn spread_amount(&self) -> f64 {
        self.coupon.notional * self.coupon.payment_accrual * self.spread
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.coupon.currency
    }

    /// Returns the payment time.
    pub fn payment_time(&self) -> f64 {
        self.coupon.payment_time
    }

    /// Returns the notional.
    pub fn notional(&self) -> f64 {
        self.coupon.notional
    }
}

/// A coupon paying `notional × accrual × (factor × L + spread)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CouponIborGearingFields")]
pub struct CouponIborGearing {
    coupon: CouponIbor,
    factor: f64,
    spread: f64,
}

impl CouponIborGearing {
    /// Creates a geared Ibor coupon.
    pub fn new(
        currency: Currency,
        payment_time: f64,
        payment_accrual: f64,
        notional: f64,
        fixing: IborFixing,
        factor: f64,
        spread: f64,
    ) -> InstrumentResult<Self> {
        Ok(Self {
            coupon: CouponIbor::new(currency, payment_time, payment_accrual, notional, fixing)?,
            factor: check_finite("gearing factor", factor)?,
            spread: check_finite("spread", spread)?,
        })
    }

    /// Returns the underlying Ibor coupon.
    pub fn coupon(&self) -> &CouponIbor {
        &self.coupon
    }

    /// Returns the gearing factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Returns the spread.
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Returns the fixed amount paid by the spread.
    pub fn spread_amount(&self) -> f64 {
        self.coupon.notional * self.coupon.payment_accrual * self.spread
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.coupon.currency
    }

    /// Returns the payment time.
    pub fn payment_time(&self) -> f64 {
        self.coupon.payment_time
    }

    /// Returns the notional.
    pub fn notional(&self) -> f64 {
        self.coupon.notional
    }
}

#[derive(Deserialize)]
struct IborFixingFields {
    index: IborIndex,
    fixing_time: f64,
    start: f64,
    end: f64,
    accrual: f64,
}

impl TryFrom<IborFixingFields> for IborFixing {
    type Error = InstrumentError;

    fn try_from(f: IborFixingFields) -> Result<Self, Self::Error> {
        Self::new(f.index, f.fixing_time, f.start, f.end, f.accrual)
    }
}

#[derive(Deserialize)]
struct CouponIborFields {
    currency: Currency,
    payment_time: f64,
    payment_accrual: f64,
    notional: f64,
    fixing: IborFixing,
}

impl TryFrom<CouponIborFields> for CouponIbor {
    type Error = InstrumentError;

    fn try_from(f: CouponIborFields) -> Result<Self, Self::Error> {
        Self::new(f.currency, f.payment_time, f.payment_accrual, f.notional, f.fixing)
    }
}

#[derive(Deserialize)]
struct CouponIborSpreadFields {
    coupon: CouponIbor,
    spread: f64,
}

impl TryFrom<CouponIborSpreadFields> for CouponIborSpread {
    type Error = InstrumentError;

    fn try_from(f: CouponIborSpreadFields) -> Result<Self, Self::Error> {
        Ok(Self {
            coupon: f.coupon,
            spread: check_finite("spread", f.spread)?,
        })
    }
}

#[derive(Deserialize)]
struct CouponIborGearingFields {
    coupon: CouponIbor,
    factor: f64,
    spread: f64,
}

impl TryFrom<CouponIborGearingFields> for CouponIborGearing {
    type Error = InstrumentError;

    fn try_from(f: CouponIborGearingFields) -> Result<Self, Self::Error> {
        Ok(Self {
            coupon: f.coupon,
            factor: check_finite("gearing factor", f.factor)?,
            spread: check_finite("spread", f.spread)?,
        })
    }
}
