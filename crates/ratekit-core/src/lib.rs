//! # Ratekit Core
//!
//! Core types shared by every Ratekit crate.
//!
//! This crate provides the foundational building blocks:
//!
//! - **Currencies**: ISO 4217 codes used to key amounts and discounting curves
//! - **Rate Indices**: Ibor-style indices used to key forward curves
//! - **Multi-Currency Amounts**: additive per-currency values returned by pricing
//! - **FX Matrix**: spot rates used to collapse multi-currency results
//!
//! ## Example
//!
//! ```rust
//! use ratekit_core::prelude::*;
//!
//! let pv = MultipleCurrencyAmount::of(Currency::USD, 100.0)
//!     .plus(&MultipleCurrencyAmount::of(Currency::EUR, 50.0));
//!
//! let fx = FxMatrix::new(Currency::USD).with_rate(Currency::EUR, 1.10).unwrap();
//! let total = fx.convert(&pv, Currency::USD).unwrap();
//! assert!((total - 155.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Currency, FxMatrix, IborIndex, MultipleCurrencyAmount};
}

pub use error::{CoreError, CoreResult};
pub use types::{Currency, FxMatrix, IborIndex, MultipleCurrencyAmount};
