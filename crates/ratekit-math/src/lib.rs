//! # Ratekit Math
//!
//! Numerical utilities for the Ratekit interest rate library.
//!
//! This crate provides:
//!
//! - **Interpolation**: piecewise linear interpolation exposing the local
//!   basis weights of every node, as needed for parameter sensitivities
//! - **Linear Algebra**: LU and SVD solves behind a single
//!   [`DecompositionMethod`](linear_algebra::DecompositionMethod) switch
//! - **Solvers**: a Broyden quasi-Newton vector root finder seeded with an
//!   analytic Jacobian
//!
//! ## Design Philosophy
//!
//! - **Explicit failure**: singular systems are reported, never papered over
//! - **Dense and small**: calibration systems have tens of unknowns, so
//!   everything is dense `nalgebra` storage

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{Interpolator, LinearInterpolator};
    pub use crate::linear_algebra::{condition_number, invert, solve, DecompositionMethod};
    pub use crate::solvers::{BroydenVectorRootFinder, VectorRootFinderConfig, VectorRootResult};
}

pub use error::{MathError, MathResult};
