//! Multi-curve framework.
//!
//! A [`MulticurveProvider`] answers the two market-data queries every pricer
//! needs:
//!
//! - `discount_factor(currency, t)`, served by the currency's discounting curve
//! - `forward_rate(index, start, end, accrual)`, served by the index's
//!   forward curve with simple compounding
//!
//! One curve may serve several indices and a currency at once. Curves are
//! held behind `Arc`, so bumped providers share every curve they do not
//! replace.

mod builder;
mod provider;

pub use builder::MulticurveProviderBuilder;
pub use provider::MulticurveProvider;
