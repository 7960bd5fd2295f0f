//! FX forwards.

use ratekit_core::Currency;
use serde::{Deserialize, Serialize};

use crate::error::{InstrumentError, InstrumentResult};
use crate::payments::PaymentFixed;

/// An FX forward: two fixed payments in two different currencies,
/// usually of opposite signs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForexForwardFields")]
pub struct ForexForward {
    payment_one: PaymentFixed,
    payment_two: PaymentFixed,
}

impl ForexForward {
    /// Creates an FX forward.
    ///
    /// # Errors
    ///
    /// Returns an error if both payments are in the same currency.
    pub fn new(payment_one: PaymentFixed, payment_two: PaymentFixed) -> InstrumentResult<Self> {
        if payment_one.currency() == payment_two.currency() {
            return Err(InstrumentError::invalid(format!(
                "FX forward needs two currencies, both legs pay {}",
                payment_one.currency()
            )));
        }
        Ok(Self {
            payment_one,
            payment_two,
        })
    }

    /// Returns the first payment.
    pub fn payment_one(&self) -> &PaymentFixed {
        &self.payment_one
    }

    /// Returns the second payment.
    pub fn payment_two(&self) -> &PaymentFixed {
        &self.payment_two
    }

    /// Returns the two currencies.
    pub fn currencies(&self) -> (Currency, Currency) {
        (self.payment_one.currency(), self.payment_two.currency())
    }

    /// Returns the contractual rate: units of currency two per unit of
    /// currency one.
    pub fn strike(&self) -> f64 {
        -self.payment_two.amount() / self.payment_one.amount()
    }
}

#[derive(Deserialize)]
struct ForexForwardFields {
    payment_one: PaymentFixed,
    payment_two: PaymentFixed,
}

impl TryFrom<ForexForwardFields> for ForexForward {
    type Error = InstrumentError;

    fn try_from(f: ForexForwardFields) -> Result<Self, Self::Error> {
        Self::new(f.payment_one, f.payment_two)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_strike_and_validation() {
        let eur = PaymentFixed::new(Currency::EUR, 1.0, 1_000_000.0).unwrap();
        let usd = PaymentFixed::new(Currency::USD, 1.0, -1_120_000.0).unwrap();
        let fwd = ForexForward::new(eur, usd).unwrap();
        assert_relative_eq!(fwd.strike(), 1.12);
        assert_eq!(fwd.currencies(), (Currency::EUR, Currency::USD));

        assert!(ForexForward::new(eur, eur).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let eur = PaymentFixed::new(Currency::EUR, 1.0, 1_000_000.0).unwrap();
        let usd = PaymentFixed::new(Currency::USD, 1.0, -1_120_000.0).unwrap();
        let fwd = ForexForward::new(eur, usd).unwrap();
        let mut value = serde_json::to_value(fwd).unwrap();
        value["payment_two"]["currency"] = serde_json::json!("EUR");
        assert!(serde_json::from_value::<ForexForward>(value).is_err());

        let mut value = serde_json::to_value(fwd).unwrap();
        value["payment_one"]["payment_time"] = serde_json::json!(-1.0);
        assert!(serde_json::from_value::<ForexForward>(value).is_err());
    }
}
