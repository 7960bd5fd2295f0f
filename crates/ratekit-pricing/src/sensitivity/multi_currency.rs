use std::collections::BTreeMap;
use std::ops::Add;

use ratekit_core::{CoreError, CoreResult, Currency, FxMatrix};
use serde::{Deserialize, Serialize};

use super::MulticurveSensitivity;

/// Curve-functional sensitivities of a multi-currency amount, one
/// [`MulticurveSensitivity`] per currency of the amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultipleCurrencyMulticurveSensitivity {
    sensitivities: BTreeMap<Currency, MulticurveSensitivity>,
}

impl MultipleCurrencyMulticurveSensitivity {
    /// The zero sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a single-currency sensitivity.
    #[must_use]
    pub fn of(currency: Currency, sensitivity: MulticurveSensitivity) -> Self {
        let mut sensitivities = BTreeMap::new();
        sensitivities.insert(currency, sensitivity);
        Self { sensitivities }
    }

    /// Returns the sensitivity of one currency, if any.
    #[must_use]
    pub fn get(&self, currency: Currency) -> Option<&MulticurveSensitivity> {
        self.sensitivities.get(&currency)
    }

    /// Returns the sensitivity of one currency, zero if absent.
    #[must_use]
    pub fn sensitivity(&self, currency: Currency) -> MulticurveSensitivity {
        self.get(currency).cloned().unwrap_or_default()
    }

    /// Currencies present.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.sensitivities.keys().copied()
    }

    /// Iterates over `(currency, sensitivity)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, &MulticurveSensitivity)> {
        self.sensitivities.iter().map(|(c, s)| (*c, s))
    }

    /// Adds a single-currency sensitivity.
    #[must_use]
    pub fn plus_sensitivity(mut self, currency: Currency, sensitivity: MulticurveSensitivity) -> Self {
        let slot = self.sensitivities.entry(currency).or_default();
        *slot = std::mem::take(slot).plus(sensitivity);
        self
    }

    /// Sum of two sensitivities.
    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        other
            .sensitivities
            .into_iter()
            .fold(self, |acc, (ccy, sens)| acc.plus_sensitivity(ccy, sens))
    }

    /// Multiplies every entry by `factor`.
    #[must_use]
    pub fn multiplied_by(self, factor: f64) -> Self {
        Self {
            sensitivities: self
                .sensitivities
                .into_iter()
                .map(|(ccy, sens)| (ccy, sens.multiplied_by(factor)))
                .collect(),
        }
    }

    /// Cleans every currency's sensitivity.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        Self {
            sensitivities: self
                .sensitivities
                .iter()
                .map(|(ccy, sens)| (*ccy, sens.cleaned()))
                .collect(),
        }
    }

    /// Returns the single `(currency, sensitivity)` pair.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotSingleCurrency` unless exactly one currency is present.
    pub fn single_currency(self) -> CoreResult<(Currency, MulticurveSensitivity)> {
        let count = self.sensitivities.len();
        let mut entries = self.sensitivities.into_iter();
        match (entries.next(), count) {
            (Some(entry), 1) => Ok(entry),
            _ => Err(CoreError::NotSingleCurrency { count }),
        }
    }

    /// Converts every currency's sensitivity into `currency` at spot FX rates.
    ///
    /// FX spot rates are held constant: only curve risk is converted.
    pub fn converted(&self, currency: Currency, fx: &FxMatrix) -> CoreResult<MulticurveSensitivity> {
        self.sensitivities
            .iter()
            .try_fold(MulticurveSensitivity::new(), |acc, (ccy, sens)| {
                let rate = fx.fx_rate(*ccy, currency)?;
                Ok(acc.plus(sens.clone().multiplied_by(rate)))
            })
    }
}

impl Add for MultipleCurrencyMulticurveSensitivity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.plus(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(value: f64) -> MultipleCurrencyMulticurveSensitivity {
        MultipleCurrencyMulticurveSensitivity::of(
            Currency::USD,
            MulticurveSensitivity::of_discounting("USD-OIS", vec![(1.0, value)]),
        )
    }

    #[test]
    fn test_plus_by_currency() {
        let eur = MultipleCurrencyMulticurveSensitivity::of(
            Currency::EUR,
            MulticurveSensitivity::of_discounting("EUR-OIS", vec![(2.0, 4.0)]),
        );
        let sum = usd(1.0) + usd(2.0) + eur;

        assert_eq!(sum.currencies().count(), 2);
        assert_eq!(
            sum.sensitivity(Currency::USD).discounting()["USD-OIS"],
            vec![(1.0, 1.0), (1.0, 2.0)]
        );
        assert!(sum.clone().single_currency().is_err());
    }

    #[test]
    fn test_converted() {
        let eur = MultipleCurrencyMulticurveSensitivity::of(
            Currency::EUR,
            MulticurveSensitivity::of_discounting("EUR-OIS", vec![(2.0, 4.0)]),
        );
        let fx = FxMatrix::new(Currency::USD).with_rate(Currency::EUR, 1.25).unwrap();
        let converted = (usd(1.0) + eur).converted(Currency::USD, &fx).unwrap();
        assert_eq!(converted.discounting()["EUR-OIS"], vec![(2.0, 5.0)]);
        assert_eq!(converted.discounting()["USD-OIS"], vec![(1.0, 1.0)]);

        let (ccy, sens) = usd(3.0).single_currency().unwrap();
        assert_eq!(ccy, Currency::USD);
        assert_eq!(sens.discounting()["USD-OIS"], vec![(1.0, 3.0)]);
    }
}
