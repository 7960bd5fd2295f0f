//! # Ratekit Pricing
//!
//! Valuation and risk for multi-curve interest rate derivatives.
//!
//! This crate provides:
//!
//! - **Calculators**: present value, curve sensitivity, par rate, par
//!   spread, coupon sensitivity, last time and cash-flow equivalents, each an
//!   [`InstrumentVisitor`](ratekit_instruments::InstrumentVisitor) over the
//!   closed instrument set
//! - **Methods**: per-instrument discounting formulas paired with their
//!   adjoints
//! - **Parameter sensitivity**: curve-functional sensitivities projected on
//!   curve nodes, and PV01
//! - **Gamma**: intra-curve and cross-curve Hessians by finite difference of
//!   the analytic node sensitivities
//!
//! ## Quick Start
//!
//! ```rust
//! use ratekit_core::{Currency, IborIndex};
//! use ratekit_curves::prelude::*;
//! use ratekit_instruments::prelude::*;
//! use ratekit_pricing::prelude::*;
//!
//! let libor = IborIndex::new("USD LIBOR 3M", Currency::USD, 3);
//! let provider = MulticurveProviderBuilder::new()
//!     .discounting_curve(Currency::USD, YieldCurve::flat("USD-OIS", 0.02).unwrap())
//!     .forward_curve(libor.clone(), YieldCurve::flat("USD-LIBOR-3M", 0.03).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let fixing = IborFixing::new(libor, 0.75, 0.75, 1.0, 0.25).unwrap();
//! let coupon: InstrumentDerivative = CouponIbor::new(Currency::USD, 1.0, 0.25, 1e6, fixing).unwrap().into();
//!
//! let pv = coupon.accept(&PresentValueCalculator, &provider).unwrap();
//! let nodes = <ParameterSensitivityCalculator>::default().calculate(&coupon, &provider).unwrap();
//!
//! assert!(pv.amount(Currency::USD) > 0.0);
//! assert_eq!(nodes.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]

pub mod calculators;
pub mod error;
pub mod gamma;
pub mod methods;
pub mod parameter_sensitivity;
pub mod pv01;
pub mod sensitivity;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calculators::{
        CashFlowEquivalent, CashFlowEquivalentCalculator, LastTimeCalculator, ParRateCalculator,
        ParRateCurveSensitivityCalculator, ParSpreadMarketQuoteCalculator, PresentValueCalculator,
        PresentValueCouponSensitivityCalculator, PresentValueCurveSensitivityCalculator,
        TheoreticalCashFlowEquivalentCalculator,
    };
    pub use crate::error::{PricingError, PricingResult};
    pub use crate::gamma::{CrossGamma, GammaCalculator, GammaConfig};
    pub use crate::methods::DiscountingMethod;
    pub use crate::parameter_sensitivity::{curve_parameter_sensitivities, ParameterSensitivityCalculator};
    pub use crate::pv01::{Pv01Calculator, BASIS_POINT};
    pub use crate::sensitivity::{
        ForwardSensitivity, MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity,
        MultipleCurrencyParameterSensitivity,
    };
}

pub use error::{PricingError, PricingResult};
