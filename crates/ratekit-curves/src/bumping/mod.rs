//! Curve bumping for sensitivity analysis.
//!
//! Bumps act on one named curve of a [`MulticurveProvider`] and return a new
//! provider that shares every other curve with the original:
//!
//! - [`ParallelBump`]: uniform shift of every node of a curve (PV01)
//! - [`NodeBump`]: shift of a single node (bucketed risk, gamma)
//!
//! # Example: PV01 by bump and reprice
//!
//! ```rust
//! use ratekit_core::Currency;
//! use ratekit_curves::bumping::ParallelBump;
//! use ratekit_curves::{MulticurveProviderBuilder, YieldCurve};
//!
//! let provider = MulticurveProviderBuilder::new()
//!     .discounting_curve(Currency::USD, YieldCurve::flat("USD-OIS", 0.02).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let bumped = ParallelBump::one_bp_up().apply(&provider, "USD-OIS").unwrap();
//! let pv = |p: &ratekit_curves::MulticurveProvider| 1e6 * p.discount_factor(Currency::USD, 5.0).unwrap();
//! let pv01 = pv(&bumped) - pv(&provider);
//! assert!(pv01 < 0.0);
//! ```

mod node;
mod parallel;

pub use node::{bump_node, NodeBump};
pub use parallel::{parallel_shift, ParallelBump};

use crate::multicurve::MulticurveProvider;
