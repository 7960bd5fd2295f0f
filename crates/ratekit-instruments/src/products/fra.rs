//! Forward rate agreements.

use ratekit_core::{Currency, IborIndex};
use serde::{Deserialize, Serialize};

use crate::error::{check_finite, check_time, InstrumentError, InstrumentResult};
use crate::payments::IborFixing;

/// A forward rate agreement settled at the start of the fixing period.
///
/// The settlement amount at `payment_time` is
///
/// ```text
/// notional × accrual × (L - rate) / (1 + accrual × L)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForwardRateAgreementFields")]
pub struct ForwardRateAgreement {
    currency: Currency,
    payment_time: f64,
    payment_accrual: f64,
    notional: f64,
    fixing: IborFixing,
    rate: f64,
}

impl ForwardRateAgreement {
    /// Creates a FRA.
    pub fn new(
        currency: Currency,
        payment_time: f64,
        payment_accrual: f64,
        notional: f64,
        fixing: IborFixing,
        rate: f64,
    ) -> InstrumentResult<Self> {
        Ok(Self {
            currency,
            payment_time: check_time("payment time", payment_time)?,
            payment_accrual: check_time("payment accrual", payment_accrual)?,
            notional: check_finite("notional", notional)?,
            fixing,
            rate: check_finite("rate", rate)?,
        })
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the settlement time.
    pub fn payment_time(&self) -> f64 {
        self.payment_time
    }

    /// Returns the accrual fraction.
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

    /// Returns the contractual rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the same FRA at another rate.
    #[must_use]
    pub fn with_rate(&self, rate: f64) -> Self {
        Self {
            rate,
            ..self.clone()
        }
    }
}

#[derive(Deserialize)]
struct ForwardRateAgreementFields {
    currency: Currency,
    payment_time: f64,
    payment_accrual: f64,
    notional: f64,
    fixing: IborFixing,
    rate: f64,
}

impl TryFrom<ForwardRateAgreementFields> for ForwardRateAgreement {
    type Error = InstrumentError;

    fn try_from(f: ForwardRateAgreementFields) -> Result<Self, Self::Error> {
        Self::new(
            f.currency,
            f.payment_time,
            f.payment_accrual,
            f.notional,
            f.fixing,
            f.rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fra() -> ForwardRateAgreement {
        let index = IborIndex::new("USD LIBOR 3M", Currency::USD, 3);
        let fixing = IborFixing::new(index, 0.5, 0.5, 0.75, 0.25).unwrap();
        ForwardRateAgreement::new(Currency::USD, 0.5, 0.25, 1e6, fixing, 0.03).unwrap()
    }

    #[test]
    fn test_serde_validates() {
        let fra = fra();
        let back: ForwardRateAgreement =
            serde_json::from_str(&serde_json::to_string(&fra).unwrap()).unwrap();
        assert_eq!(back, fra);

        let mut value = serde_json::to_value(&fra).unwrap();
        value["payment_time"] = serde_json::json!(-0.5);
        assert!(serde_json::from_value::<ForwardRateAgreement>(value).is_err());

        let mut value = serde_json::to_value(&fra).unwrap();
        value["fixing"]["start"] = serde_json::json!(1.0);
        assert!(serde_json::from_value::<ForwardRateAgreement>(value).is_err());
    }
}
