//! Swaps.

use std::collections::BTreeSet;

use ratekit_core::Currency;
use serde::{Deserialize, Serialize};

use crate::error::{InstrumentError, InstrumentResult};
use crate::payments::Annuity;

/// A swap of two legs.
///
/// The direction of each leg is carried by the sign of its notionals. The
/// legs may pay in different currencies; calculators that only make sense
/// in a single currency reject such swaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swap {
    first_leg: Annuity,
    second_leg: Annuity,
}

impl Swap {
    /// Creates a swap.
    #[must_use]
    pub fn new(first_leg: Annuity, second_leg: Annuity) -> Self {
        Self {
            first_leg,
            second_leg,
        }
    }

    /// Returns the first leg.
    pub fn first_leg(&self) -> &Annuity {
        &self.first_leg
    }

    /// Returns the second leg.
    pub fn second_leg(&self) -> &Annuity {
        &self.second_leg
    }

    /// Returns true when both legs pay in the same currency.
    pub fn is_single_currency(&self) -> bool {
        self.first_leg.currency() == self.second_leg.currency()
    }

    /// Returns the common currency of both legs, if any.
    pub fn currency(&self) -> Option<Currency> {
        self.is_single_currency().then(|| self.first_leg.currency())
    }
}

/// A swap with any number of legs, e.g. a basis swap with a spread leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SwapMultilegFields")]
pub struct SwapMultileg {
    legs: Vec<Annuity>,
}

impl SwapMultileg {
    /// Creates a multi-leg swap.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no legs.
    pub fn new(legs: Vec<Annuity>) -> InstrumentResult<Self> {
        if legs.is_empty() {
            return Err(InstrumentError::Empty {
                what: "multi-leg swap",
            });
        }
        Ok(Self { legs })
    }

    /// Returns the legs.
    pub fn legs(&self) -> &[Annuity] {
        &self.legs
    }

    /// Returns the set of leg currencies.
    pub fn currencies(&self) -> BTreeSet<Currency> {
        self.legs.iter().map(Annuity::currency).collect()
    }
}

#[derive(Deserialize)]
struct SwapMultilegFields {
    legs: Vec<Annuity>,
}

impl TryFrom<SwapMultilegFields> for SwapMultileg {
    type Error = InstrumentError;

    fn try_from(f: SwapMultilegFields) -> Result<Self, Self::Error> {
        Self::new(f.legs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::PaymentFixed;

    fn leg(currency: Currency) -> Annuity {
        Annuity::from_payments(vec![PaymentFixed::new(currency, 1.0, 1.0).unwrap()]).unwrap()
    }

    #[test]
    fn test_swap_currency() {
        let swap = Swap::new(leg(Currency::USD), leg(Currency::USD));
        assert_eq!(swap.currency(), Some(Currency::USD));

        let xccy = Swap::new(leg(Currency::USD), leg(Currency::EUR));
        assert!(!xccy.is_single_currency());
        assert_eq!(xccy.currency(), None);
    }

    #[test]
    fn test_multileg() {
        assert!(SwapMultileg::new(vec![]).is_err());
        let swap = SwapMultileg::new(vec![leg(Currency::GBP), leg(Currency::GBP), leg(Currency::USD)])
            .unwrap();
        assert_eq!(swap.legs().len(), 3);
        assert_eq!(swap.currencies().len(), 2);

        assert!(serde_json::from_str::<SwapMultileg>(r#"{"legs":[]}"#).is_err());
    }
}
