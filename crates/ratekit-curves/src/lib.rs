//! # Ratekit Curves
//!
//! Yield curves and multi-curve providers for the Ratekit interest rate library.
//!
//! This crate provides:
//!
//! - **Yield Curves**: named, node-based continuously compounded zero-rate
//!   curves with flat extrapolation and per-node parameter sensitivities
//! - **Interpolation**: linear on zero rates, or linear on `r·t` (log-linear
//!   discount factors)
//! - **Multi-Curve Provider**: curves addressed by currency (discounting) or
//!   by Ibor index (forwards), plus an FX matrix
//! - **Bumping**: node and parallel bumps producing shallow copies that share
//!   every untouched curve
//!
//! ## Curve parametrisation
//!
//! Every curve is parametrised by its zero rates `r_i` at node times `t_i`,
//! so that `DF(t) = exp(-r(t)·t)` and
//!
//! ```text
//! ∂DF(t)/∂r(t) = -t · DF(t)
//! ```
//!
//! Sensitivity calculators rely on this identity.
//!
//! ## Quick Start
//!
//! ```rust
//! use ratekit_core::{Currency, IborIndex};
//! use ratekit_curves::prelude::*;
//!
//! let discount = YieldCurve::new("USD-OIS", vec![1.0, 5.0], vec![0.02, 0.025], InterpolationMethod::Linear).unwrap();
//! let libor = IborIndex::new("USD LIBOR 3M", Currency::USD, 3);
//! let forward = YieldCurve::flat("USD-LIBOR-3M", 0.03).unwrap();
//!
//! let provider = MulticurveProviderBuilder::new()
//!     .discounting_curve(Currency::USD, discount)
//!     .forward_curve(libor.clone(), forward)
//!     .build()
//!     .unwrap();
//!
//! let df = provider.discount_factor(Currency::USD, 2.0).unwrap();
//! let fwd = provider.forward_rate(&libor, 1.0, 1.25, 0.25).unwrap();
//! assert!(df < 1.0 && fwd > 0.03);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]

pub mod bumping;
pub mod curve;
pub mod error;
pub mod interpolation;
pub mod multicurve;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bumping::{bump_node, parallel_shift, NodeBump, ParallelBump};
    pub use crate::curve::YieldCurve;
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::interpolation::InterpolationMethod;
    pub use crate::multicurve::{MulticurveProvider, MulticurveProviderBuilder};
}

pub use curve::YieldCurve;
pub use error::{CurveError, CurveResult};
pub use interpolation::InterpolationMethod;
pub use multicurve::{MulticurveProvider, MulticurveProviderBuilder};
