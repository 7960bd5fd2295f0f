//! # Ratekit Calibration
//!
//! Joint multi-curve calibration for the Ratekit interest rate library.
//!
//! This crate provides:
//!
//! - **Templates**: the curves to solve for, their routing in the provider
//!   and the market instruments pinning their nodes
//! - **Calibrator**: one Broyden root search over every node of every
//!   template, with analytic Jacobians and a decomposition fallback
//! - **Configuration**: par rate or present value matching, tolerances,
//!   decompositions and the initial guess, loadable from TOML
//!
//! Forward and funding curves are solved as a single system, since each
//! curve's instruments depend on the other.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod calibrator;
pub mod config;
pub mod error;
pub mod template;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calibrator::{CalibratedCurve, CalibratedCurves, MulticurveCalibrator};
    pub use crate::config::{CalibrationConfig, CalibrationMode, InitialGuess};
    pub use crate::error::{CalibrationAttempt, CalibrationError, CalibrationResult, CalibrationStage};
    pub use crate::template::{CalibrationInstrument, CurveTemplate};
}

pub use calibrator::{CalibratedCurve, CalibratedCurves, MulticurveCalibrator};
pub use config::{CalibrationConfig, CalibrationMode, InitialGuess};
pub use error::{CalibrationError, CalibrationResult};
pub use template::{CalibrationInstrument, CurveTemplate};
