//! Spot FX rates against a base currency.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Currency, MultipleCurrencyAmount};
use crate::error::{CoreError, CoreResult};

/// FX matrix storing, for each currency, the value of one unit in the base
/// currency.
///
/// Cross rates are derived through the base: `fx_rate(a, b)` is the number of
/// units of `b` worth one unit of `a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxMatrix {
    base: Currency,
    rates: BTreeMap<Currency, f64>,
}

impl FxMatrix {
    /// Creates a matrix knowing only its base currency.
    #[must_use]
    pub fn new(base: Currency) -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(base, 1.0);
        Self { base, rates }
    }

    /// Adds the value of one unit of `currency` expressed in the base currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is not strictly positive and finite.
    pub fn with_rate(mut self, currency: Currency, units_of_base: f64) -> CoreResult<Self> {
        if !(units_of_base.is_finite() && units_of_base > 0.0) {
            return Err(CoreError::invalid_input(format!(
                "FX rate for {} must be positive, got {}",
                currency, units_of_base
            )));
        }
        if currency == self.base && units_of_base != 1.0 {
            return Err(CoreError::invalid_input(format!(
                "base currency {} must have rate 1",
                currency
            )));
        }
        self.rates.insert(currency, units_of_base);
        Ok(self)
    }

    /// Returns the base currency.
    #[must_use]
    pub fn base(&self) -> Currency {
        self.base
    }

    /// Returns true when the matrix can convert the currency.
    #[must_use]
    pub fn contains(&self, currency: Currency) -> bool {
        self.rates.contains_key(&currency)
    }

    fn to_base(&self, currency: Currency) -> CoreResult<f64> {
        self.rates
            .get(&currency)
            .copied()
            .ok_or(CoreError::MissingFxRate {
                currency,
                base: self.base,
            })
    }

    /// Number of units of `to` worth one unit of `from`.
    pub fn fx_rate(&self, from: Currency, to: Currency) -> CoreResult<f64> {
        if from == to {
            return Ok(1.0);
        }
        Ok(self.to_base(from)? / self.to_base(to)?)
    }

    /// Converts a multi-currency amount into a single currency.
    pub fn convert(&self, amount: &MultipleCurrencyAmount, to: Currency) -> CoreResult<f64> {
        amount
            .iter()
            .try_fold(0.0, |acc, (ccy, value)| Ok(acc + value * self.fx_rate(ccy, to)?))
    }
}

impl Default for FxMatrix {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn matrix() -> FxMatrix {
        FxMatrix::new(Currency::USD)
            .with_rate(Currency::EUR, 1.10)
            .unwrap()
            .with_rate(Currency::GBP, 1.25)
            .unwrap()
    }

    #[test]
    fn test_cross_rate() {
        let fx = matrix();
        assert_relative_eq!(fx.fx_rate(Currency::EUR, Currency::USD).unwrap(), 1.10);
        assert_relative_eq!(fx.fx_rate(Currency::USD, Currency::EUR).unwrap(), 1.0 / 1.10);
        assert_relative_eq!(
            fx.fx_rate(Currency::EUR, Currency::GBP).unwrap(),
            1.10 / 1.25,
            epsilon = 1e-14
        );
        assert_relative_eq!(fx.fx_rate(Currency::JPY, Currency::JPY).unwrap(), 1.0);
    }

    #[test]
    fn test_missing_rate() {
        let fx = matrix();
        assert_eq!(
            fx.fx_rate(Currency::JPY, Currency::USD),
            Err(CoreError::MissingFxRate {
                currency: Currency::JPY,
                base: Currency::USD
            })
        );
    }

    #[test]
    fn test_invalid_rate() {
        assert!(FxMatrix::new(Currency::USD)
            .with_rate(Currency::EUR, 0.0)
            .is_err());
        assert!(FxMatrix::new(Currency::USD)
            .with_rate(Currency::USD, 2.0)
            .is_err());
    }

    #[test]
    fn test_convert() {
        let fx = matrix();
        let amount = MultipleCurrencyAmount::of(Currency::EUR, 100.0)
            .plus_amount(Currency::GBP, 10.0);
        assert_relative_eq!(
            fx.convert(&amount, Currency::USD).unwrap(),
            110.0 + 12.5,
            epsilon = 1e-12
        );
    }
}
