//! Legs: ordered sequences of payments.

use ratekit_core::Currency;
use serde::{Deserialize, Serialize};

use super::{CouponFixed, Payment};
use crate::error::{InstrumentError, InstrumentResult};

/// A leg: a non-empty, ordered sequence of payments in one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Payment>", into = "Vec<Payment>")]
pub struct Annuity {
    payments: Vec<Payment>,
}

impl Annuity {
    /// Creates a leg.
    ///
    /// # Errors
    ///
    /// Returns an error if `payments` is empty or mixes currencies.
    pub fn new(payments: Vec<Payment>) -> InstrumentResult<Self> {
        let first = payments.first().ok_or(InstrumentError::Empty { what: "annuity" })?;
        let expected = first.currency();
        if let Some(other) = payments.iter().find(|p| p.currency() != expected) {
            return Err(InstrumentError::MixedCurrencies {
                expected,
                found: other.currency(),
            });
        }
        Ok(Self { payments })
    }

    /// Creates a leg from anything convertible to payments.
    pub fn from_payments<P, I>(payments: I) -> InstrumentResult<Self>
    where
        P: Into<Payment>,
        I: IntoIterator<Item = P>,
    {
        Self::new(payments.into_iter().map(Into::into).collect())
    }

    /// Returns the payments.
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// Returns the number of payments.
    pub fn len(&self) -> usize {
        self.payments.len()
    }

    /// Always false: legs are never empty.
    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Returns the leg currency.
    pub fn currency(&self) -> Currency {
        self.payments[0].currency()
    }

    /// Returns the fixed coupons if every payment is a [`CouponFixed`].
    pub fn fixed_coupons(&self) -> Option<Vec<&CouponFixed>> {
        self.payments
            .iter()
            .map(|p| match p {
                Payment::CouponFixed(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Returns a fixed-coupon leg with every rate replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the leg contains anything other than fixed coupons.
    pub fn with_fixed_rate(&self, rate: f64) -> InstrumentResult<Self> {
        let coupons = self.fixed_coupons().ok_or_else(|| {
            InstrumentError::invalid("only fixed-coupon legs can change their rate")
        })?;
        Self::from_payments(coupons.into_iter().map(|c| c.with_rate(rate)))
    }
}

impl TryFrom<Vec<Payment>> for Annuity {
    type Error = InstrumentError;

    fn try_from(payments: Vec<Payment>) -> Result<Self, Self::Error> {
        Self::new(payments)
    }
}

impl From<Annuity> for Vec<Payment> {
    fn from(annuity: Annuity) -> Self {
        annuity.payments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::PaymentFixed;

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            Annuity::new(vec![]),
            Err(InstrumentError::Empty { what: "annuity" })
        );
    }

    #[test]
    fn test_rejects_mixed_currencies() {
        let result = Annuity::from_payments(vec![
            PaymentFixed::new(Currency::USD, 1.0, 1.0).unwrap(),
            PaymentFixed::new(Currency::EUR, 2.0, 1.0).unwrap(),
        ]);
        assert_eq!(
            result,
            Err(InstrumentError::MixedCurrencies {
                expected: Currency::USD,
                found: Currency::EUR
            })
        );
    }

    #[test]
    fn test_fixed_coupon_leg() {
        let leg = Annuity::from_payments(
            (1..=3).map(|i| CouponFixed::new(Currency::USD, f64::from(i), 1.0, 100.0, 0.05).unwrap()),
        )
        .unwrap();
        assert_eq!(leg.len(), 3);
        assert_eq!(leg.fixed_coupons().map(|c| c.len()), Some(3));

        let repriced = leg.with_fixed_rate(0.02).unwrap();
        assert_eq!(repriced.fixed_coupons().unwrap()[0].fixed_rate(), 0.02);

        let mixed = Annuity::from_payments(vec![
            Payment::from(PaymentFixed::new(Currency::USD, 1.0, 1.0).unwrap()),
            Payment::from(CouponFixed::new(Currency::USD, 1.0, 1.0, 1.0, 0.01).unwrap()),
        ])
        .unwrap();
        assert!(mixed.fixed_coupons().is_none());
        assert!(mixed.with_fixed_rate(0.01).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let json = "[]";
        assert!(serde_json::from_str::<Annuity>(json).is_err());
    }
}
