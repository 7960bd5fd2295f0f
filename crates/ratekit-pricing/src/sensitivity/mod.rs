//! Sensitivity value types.
//!
//! - [`MulticurveSensitivity`]: sparse curve-functional sensitivities, the
//!   output of the adjoint calculators
//! - [`MultipleCurrencyMulticurveSensitivity`]: the same, per currency
//! - [`MultipleCurrencyParameterSensitivity`]: dense per-node vectors keyed by
//!   `(curve name, currency)`
//!
//! All of them are values: combining two sensitivities builds a new one and
//! never mutates a shared map.

mod forward;
mod multi_currency;
mod multicurve;
mod parameter;

pub use forward::ForwardSensitivity;
pub use multi_currency::MultipleCurrencyMulticurveSensitivity;
pub use multicurve::MulticurveSensitivity;
pub use parameter::MultipleCurrencyParameterSensitivity;
