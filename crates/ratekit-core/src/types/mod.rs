//! Domain types shared across the workspace.

mod amount;
mod currency;
mod fx;
mod index;

pub use amount::MultipleCurrencyAmount;
pub use currency::Currency;
pub use fx::FxMatrix;
pub use index::IborIndex;
