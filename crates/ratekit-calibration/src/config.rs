//! Calibration configuration.
//!
//! Configurations are plain values with serde defaults, so a TOML document
//! only needs the fields it changes:
//!
//! ```toml
//! mode = "present_value"
//! fallback = "svd"
//! initial_guess = "market_quote"
//!
//! [root_finder]
//! absolute_tolerance = 1e-9
//! max_iterations = 50
//! ```

use ratekit_math::linear_algebra::DecompositionMethod;
use ratekit_math::solvers::VectorRootFinderConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CalibrationError, CalibrationResult};

/// Quantity matched against each market quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationMode {
    /// Model par rate equals the quote.
    #[default]
    ParRate,
    /// Present value of the instrument, struck at its quote, is zero.
    ///
    /// The quote itself is not read by the model: instruments must already
    /// be struck at it. Deposits, FRAs and swaps with a single fixed rate
    /// on the first leg are checked and rejected when the strike differs
    /// from the quote; other instruments are taken as struck.
    PresentValue,
}

/// Starting point of the root search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialGuess {
    /// Every node starts at the same zero rate.
    Flat(f64),
    /// Each node starts at the quote of the instrument defining it.
    MarketQuote,
}

impl Default for InitialGuess {
    fn default() -> Self {
        Self::Flat(0.01)
    }
}

fn default_fallback() -> DecompositionMethod {
    DecompositionMethod::Svd
}

/// Configuration of a multi-curve calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// What the model matches.
    #[serde(default)]
    pub mode: CalibrationMode,
    /// Root finder tolerances and iteration cap.
    #[serde(default)]
    pub root_finder: VectorRootFinderConfig,
    /// Decomposition tried first.
    #[serde(default)]
    pub primary: DecompositionMethod,
    /// Decomposition retried once after a numerical failure.
    #[serde(default = "default_fallback")]
    pub fallback: DecompositionMethod,
    /// Starting point.
    #[serde(default)]
    pub initial_guess: InitialGuess,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            mode: CalibrationMode::default(),
            root_finder: VectorRootFinderConfig::default(),
            primary: DecompositionMethod::Lu,
            fallback: default_fallback(),
            initial_guess: InitialGuess::default(),
        }
    }
}

impl CalibrationConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the calibration mode.
    #[must_use]
    pub fn with_mode(mut self, mode: CalibrationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the root finder configuration.
    #[must_use]
    pub fn with_root_finder(mut self, root_finder: VectorRootFinderConfig) -> Self {
        self.root_finder = root_finder;
        self
    }

    /// Sets the primary decomposition.
    #[must_use]
    pub fn with_primary(mut self, decomposition: DecompositionMethod) -> Self {
        self.primary = decomposition;
        self
    }

    /// Sets the fallback decomposition.
    #[must_use]
    pub fn with_fallback(mut self, decomposition: DecompositionMethod) -> Self {
        self.fallback = decomposition;
        self
    }

    /// Sets the initial guess.
    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: InitialGuess) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    /// Decompositions to try, in order, without repeats.
    #[must_use]
    pub fn decompositions(&self) -> Vec<DecompositionMethod> {
        if self.primary == self.fallback {
            vec![self.primary]
        } else {
            vec![self.primary, self.fallback]
        }
    }

    /// Checks the root finder limits and the initial guess.
    pub fn validate(&self) -> CalibrationResult<()> {
        self.root_finder
            .validate()
            .map_err(|e| CalibrationError::invalid_config(e.to_string()))?;
        if let InitialGuess::Flat(rate) = self.initial_guess {
            if !rate.is_finite() {
                return Err(CalibrationError::invalid_config(format!(
                    "flat initial guess must be finite, got {rate}"
                )));
            }
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> CalibrationResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| CalibrationError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to a TOML document.
    pub fn to_toml_string(&self) -> CalibrationResult<String> {
        toml::to_string(self).map_err(|e| CalibrationError::invalid_config(e.to_string()))
    }
}
