//! # Ratekit
//!
//! Multi-curve interest rate derivatives: pricing, adjoint curve
//! sensitivities, gamma and joint curve calibration.
//!
//! This crate re-exports the member crates:
//!
//! | Module | Crate |
//! |--------|-------|
//! | [`core`] | currencies, indices, multi-currency amounts, FX |
//! | [`math`] | interpolation, decompositions, Broyden root finder |
//! | [`curves`] | yield curves, multi-curve provider, bumping |
//! | [`instruments`] | instrument tree and visitor |
//! | [`pricing`] | calculators, sensitivities, PV01, gamma |
//! | [`calibration`] | multi-curve calibration |
//!
//! ## Example
//!
//! ```rust
//! use ratekit::prelude::*;
//!
//! let deposit = |end: f64, rate: f64| Cash::new(Currency::USD, 0.0, end, 1e6, rate, end).unwrap();
//! let template = CurveTemplate::new("USD-OIS", InterpolationMethod::Linear)
//!     .discounting(Currency::USD)
//!     .instrument(deposit(1.0, 0.02), 0.02)
//!     .instrument(deposit(2.0, 0.025), 0.025);
//! let calibrated = MulticurveCalibrator::default()
//!     .calibrate(&[template], &MulticurveProvider::default())
//!     .unwrap();
//!
//! let payment: InstrumentDerivative = PaymentFixed::new(Currency::USD, 1.5, 1e6).unwrap().into();
//! let pv = payment.accept(&PresentValueCalculator, &calibrated.provider).unwrap();
//! let pv01 = Pv01Calculator::default().calculate(&payment, &calibrated.provider).unwrap();
//!
//! assert!(pv.amount(Currency::USD) < 1e6);
//! assert!(pv01[&("USD-OIS".to_string(), Currency::USD)] < 0.0);
//! ```

#![warn(missing_docs)]

pub use ratekit_calibration as calibration;
pub use ratekit_core as core;
pub use ratekit_curves as curves;
pub use ratekit_instruments as instruments;
pub use ratekit_math as math;
pub use ratekit_pricing as pricing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use ratekit_calibration::prelude::*;
    pub use ratekit_core::prelude::*;
    pub use ratekit_curves::prelude::*;
    pub use ratekit_instruments::prelude::*;
    pub use ratekit_math::prelude::*;
    pub use ratekit_pricing::prelude::*;
}
