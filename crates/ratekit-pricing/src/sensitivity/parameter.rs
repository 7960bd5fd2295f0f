use std::collections::BTreeMap;

use nalgebra::DVector;
use ratekit_core::{Currency, FxMatrix};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};

type Entry = (String, Currency, DVector<f64>);

/// Dense per-node sensitivities keyed by `(curve name, currency)`.
///
/// Each vector is ordered like the curve's node times. The currency is the
/// currency of the sensitised amount, which disambiguates a curve used by
/// instruments in several currencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Entry>", into = "Vec<Entry>")]
pub struct MultipleCurrencyParameterSensitivity {
    sensitivities: BTreeMap<(String, Currency), DVector<f64>>,
}

impl MultipleCurrencyParameterSensitivity {
    /// The empty sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensitivity with one entry.
    #[must_use]
    pub fn of(curve: impl Into<String>, currency: Currency, sensitivity: DVector<f64>) -> Self {
        let mut sensitivities = BTreeMap::new();
        sensitivities.insert((curve.into(), currency), sensitivity);
        Self { sensitivities }
    }

    /// Returns the vector for a `(curve, currency)` pair.
    #[must_use]
    pub fn get(&self, curve: &str, currency: Currency) -> Option<&DVector<f64>> {
        self.sensitivities.get(&(curve.to_string(), currency))
    }

    /// Iterates over `((curve, currency), vector)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&(String, Currency), &DVector<f64>)> {
        self.sensitivities.iter()
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &(String, Currency)> {
        self.sensitivities.keys()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sensitivities.len()
    }

    /// Returns true when there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }

    /// Adds a vector to the entry for `(curve, currency)`.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidInput` if an existing vector has a
    /// different length.
    pub fn plus_entry(
        mut self,
        curve: impl Into<String>,
        currency: Currency,
        sensitivity: DVector<f64>,
    ) -> PricingResult<Self> {
        let key = (curve.into(), currency);
        match self.sensitivities.get_mut(&key) {
            Some(existing) if existing.len() != sensitivity.len() => {
                return Err(PricingError::invalid_input(format!(
                    "parameter sensitivity for {} in {} has {} nodes, cannot add {}",
                    key.0,
                    key.1,
                    existing.len(),
                    sensitivity.len()
                )));
            }
            Some(existing) => *existing += sensitivity,
            None => {
                self.sensitivities.insert(key, sensitivity);
            }
        }
        Ok(self)
    }

    /// Sum of two sensitivities.
    pub fn plus(self, other: Self) -> PricingResult<Self> {
        other
            .sensitivities
            .into_iter()
            .try_fold(self, |acc, ((curve, ccy), vector)| acc.plus_entry(curve, ccy, vector))
    }

    /// Multiplies every vector by `factor`.
    #[must_use]
    pub fn multiplied_by(mut self, factor: f64) -> Self {
        for vector in self.sensitivities.values_mut() {
            *vector *= factor;
        }
        self
    }

    /// Re-expresses every entry in `currency`, summing vectors of the same
    /// curve.
    pub fn converted(&self, currency: Currency, fx: &FxMatrix) -> PricingResult<Self> {
        self.sensitivities
            .iter()
            .try_fold(Self::new(), |acc, ((curve, ccy), vector)| {
                let rate = fx.fx_rate(*ccy, currency)?;
                acc.plus_entry(curve.clone(), currency, vector * rate)
            })
    }

    /// Sum of every node sensitivity, per key.
    #[must_use]
    pub fn totals(&self) -> BTreeMap<(String, Currency), f64> {
        self.sensitivities
            .iter()
            .map(|(key, vector)| (key.clone(), vector.sum()))
            .collect()
    }
}

impl From<Vec<Entry>> for MultipleCurrencyParameterSensitivity {
    fn from(entries: Vec<Entry>) -> Self {
        Self {
            sensitivities: entries
                .into_iter()
                .map(|(curve, ccy, vector)| ((curve, ccy), vector))
                .collect(),
        }
    }
}

impl From<MultipleCurrencyParameterSensitivity> for Vec<Entry> {
    fn from(sensitivity: MultipleCurrencyParameterSensitivity) -> Self {
        sensitivity
            .sensitivities
            .into_iter()
            .map(|((curve, ccy), vector)| (curve, ccy, vector))
            .collect()
    }
}
