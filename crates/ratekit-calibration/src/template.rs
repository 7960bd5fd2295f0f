//! Curve templates: what to calibrate and from which instruments.

use ratekit_core::{Currency, IborIndex};
use ratekit_curves::InterpolationMethod;
use ratekit_instruments::InstrumentDerivative;
use ratekit_pricing::calculators::LastTimeCalculator;
use serde::{Deserialize, Serialize};

use crate::error::{CalibrationError, CalibrationResult};

/// Node times closer than this are considered equal.
pub const NODE_TIME_TOLERANCE: f64 = 1e-10;

/// Largest accepted gap between a contractual rate and its quote in present
/// value mode.
pub const STRIKE_TOLERANCE: f64 = 1e-12;

/// A market instrument and its quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationInstrument {
    /// The instrument, struck at its quote in present value mode.
    pub derivative: InstrumentDerivative,
    /// Market quote (a rate).
    pub quote: f64,
}

impl CalibrationInstrument {
    /// Creates a calibration instrument.
    pub fn new(derivative: impl Into<InstrumentDerivative>, quote: f64) -> Self {
        Self {
            derivative: derivative.into(),
            quote,
        }
    }

    /// The rate the instrument is struck at, when it has a single one:
    /// deposit and FRA rates, and the fixed rate of a swap whose first leg
    /// pays one fixed rate.
    pub fn contractual_rate(&self) -> Option<f64> {
        match &self.derivative {
            InstrumentDerivative::Cash(cash) => Some(cash.rate()),
            InstrumentDerivative::ForwardRateAgreement(fra) => Some(fra.rate()),
            InstrumentDerivative::Swap(swap) => {
                let coupons = swap.first_leg().fixed_coupons()?;
                let rate = coupons.first()?.fixed_rate();
                coupons
                    .iter()
                    .all(|c| (c.fixed_rate() - rate).abs() <= STRIKE_TOLERANCE)
                    .then_some(rate)
            }
            _ => None,
        }
    }
}

/// The unknown curve of a calibration and the instruments pinning its
/// nodes.
///
/// Each instrument contributes one node at its last cash-flow or fixing
/// time. The curve is routed in the calibrated provider to the currency it
/// discounts and to the indices it forwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveTemplate {
    name: String,
    interpolation: InterpolationMethod,
    discounting: Option<Currency>,
    indices: Vec<IborIndex>,
    instruments: Vec<CalibrationInstrument>,
}

impl CurveTemplate {
    /// Creates an empty template.
    pub fn new(name: impl Into<String>, interpolation: InterpolationMethod) -> Self {
        Self {
            name: name.into(),
            interpolation,
            discounting: None,
            indices: Vec::new(),
            instruments: Vec::new(),
        }
    }

    /// Uses the curve to discount `currency`.
    #[must_use]
    pub fn discounting(mut self, currency: Currency) -> Self {
        self.discounting = Some(currency);
        self
    }

    /// Uses the curve to forward `index`.
    #[must_use]
    pub fn forward(mut self, index: IborIndex) -> Self {
        self.indices.push(index);
        self
    }

    /// Adds a calibrating instrument.
    #[must_use]
    pub fn instrument(mut self, derivative: impl Into<InstrumentDerivative>, quote: f64) -> Self {
        self.instruments.push(CalibrationInstrument::new(derivative, quote));
        self
    }

    /// Curve name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interpolation of the calibrated curve.
    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolation
    }

    /// Currency discounted by the curve, if any.
    pub fn discounting_currency(&self) -> Option<Currency> {
        self.discounting
    }

    /// Indices forwarded by the curve.
    pub fn indices(&self) -> &[IborIndex] {
        &self.indices
    }

    /// Calibrating instruments, in insertion order.
    pub fn instruments(&self) -> &[CalibrationInstrument] {
        &self.instruments
    }

    /// Instruments sorted by node time, with their node times.
    ///
    /// # Errors
    ///
    /// - `CalibrationError::InvalidTemplate` for a template without
    ///   instruments or routes, or with a multi-currency instrument
    /// - `CalibrationError::DuplicateNodeTime` if two instruments share a
    ///   node time
    pub fn nodes(&self) -> CalibrationResult<Vec<(f64, &CalibrationInstrument)>> {
        if self.instruments.is_empty() {
            return Err(CalibrationError::invalid_template(&self.name, "no instruments"));
        }
        if self.discounting.is_none() && self.indices.is_empty() {
            return Err(CalibrationError::invalid_template(
                &self.name,
                "curve neither discounts a currency nor forwards an index",
            ));
        }

        let mut nodes = Vec::with_capacity(self.instruments.len());
        for instrument in &self.instruments {
            if instrument.derivative.currencies().len() != 1 {
                return Err(CalibrationError::invalid_template(
                    &self.name,
                    format!("{} pays in several currencies", instrument.derivative.type_name()),
                ));
            }
            if !instrument.quote.is_finite() {
                return Err(CalibrationError::invalid_template(
                    &self.name,
                    format!("non-finite quote {}", instrument.quote),
                ));
            }
            let time = instrument.derivative.accept(&LastTimeCalculator, &())?;
            nodes.push((time, instrument));
        }
        nodes.sort_by(|a, b| a.0.total_cmp(&b.0));

        if let Some(pair) = nodes.windows(2).find(|w| w[1].0 - w[0].0 <= NODE_TIME_TOLERANCE) {
            return Err(CalibrationError::DuplicateNodeTime {
                curve: self.name.clone(),
                time: pair[1].0,
            });
        }
        Ok(nodes)
    }
}
