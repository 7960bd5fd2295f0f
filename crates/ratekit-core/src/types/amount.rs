//! Amounts held in several currencies at once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, Mul};

use super::Currency;
use crate::error::{CoreError, CoreResult};

/// A sum of amounts in different currencies.
///
/// Present values are returned in this form: a swap whose legs pay in two
/// currencies has one entry per currency, never an implicit conversion.
/// Adding an amount in a currency already present sums in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultipleCurrencyAmount {
    amounts: BTreeMap<Currency, f64>,
}

impl MultipleCurrencyAmount {
    /// Creates an empty amount.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an amount in a single currency.
    #[must_use]
    pub fn of(currency: Currency, amount: f64) -> Self {
        let mut amounts = BTreeMap::new();
        amounts.insert(currency, amount);
        Self { amounts }
    }

    /// Returns the amount for a currency, zero when absent.
    #[must_use]
    pub fn amount(&self, currency: Currency) -> f64 {
        self.amounts.get(&currency).copied().unwrap_or(0.0)
    }

    /// Returns the currencies present, in ascending order.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.amounts.keys().copied()
    }

    /// Iterates over `(currency, amount)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        self.amounts.iter().map(|(c, a)| (*c, *a))
    }

    /// Returns the number of currencies present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// Returns true when no currency is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Adds an amount in a given currency.
    #[must_use]
    pub fn plus_amount(mut self, currency: Currency, amount: f64) -> Self {
        *self.amounts.entry(currency).or_insert(0.0) += amount;
        self
    }

    /// Returns the sum of two multi-currency amounts.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        other
            .iter()
            .fold(self.clone(), |acc, (ccy, amount)| acc.plus_amount(ccy, amount))
    }

    /// Multiplies every amount by a factor.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            amounts: self
                .amounts
                .iter()
                .map(|(c, a)| (*c, a * factor))
                .collect(),
        }
    }

    /// Returns the single `(currency, amount)` pair.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotSingleCurrency` unless exactly one currency is present.
    pub fn single_currency(&self) -> CoreResult<(Currency, f64)> {
        match self.amounts.len() {
            1 => Ok(self.iter().next().unwrap_or_default()),
            count => Err(CoreError::NotSingleCurrency { count }),
        }
    }
}

impl Add for MultipleCurrencyAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.plus(&rhs)
    }
}

impl Mul<f64> for MultipleCurrencyAmount {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scaled(rhs)
    }
}

impl FromIterator<(Currency, f64)> for MultipleCurrencyAmount {
    fn from_iter<I: IntoIterator<Item = (Currency, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |acc, (c, a)| acc.plus_amount(c, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plus_merges_same_currency() {
        let a = MultipleCurrencyAmount::of(Currency::USD, 100.0);
        let b = MultipleCurrencyAmount::of(Currency::USD, 25.0)
            .plus_amount(Currency::EUR, 10.0);
        let sum = a + b;
        assert_eq!(sum.len(), 2);
        assert_relative_eq!(sum.amount(Currency::USD), 125.0);
        assert_relative_eq!(sum.amount(Currency::EUR), 10.0);
        assert_relative_eq!(sum.amount(Currency::GBP), 0.0);
    }

    #[test]
    fn test_scaled() {
        let a = MultipleCurrencyAmount::of(Currency::JPY, 3.0) * -2.0;
        assert_relative_eq!(a.amount(Currency::JPY), -6.0);
    }

    #[test]
    fn test_single_currency() {
        let a = MultipleCurrencyAmount::of(Currency::GBP, 1.5);
        assert_eq!(a.single_currency().unwrap(), (Currency::GBP, 1.5));

        let b = a.plus_amount(Currency::USD, 1.0);
        assert_eq!(
            b.single_currency(),
            Err(CoreError::NotSingleCurrency { count: 2 })
        );
        assert!(MultipleCurrencyAmount::new().single_currency().is_err());
    }

    #[test]
    fn test_from_iter() {
        let a: MultipleCurrencyAmount = vec![
            (Currency::USD, 1.0),
            (Currency::USD, 2.0),
            (Currency::CHF, 4.0),
        ]
        .into_iter()
        .collect();
        assert_relative_eq!(a.amount(Currency::USD), 3.0);
        assert_eq!(a.currencies().collect::<Vec<_>>(), vec![Currency::USD, Currency::CHF]);
    }
}
