//! Money-market and FX products.

mod cash;
mod forex;
mod fra;
mod future;

pub use cash::Cash;
pub use forex::ForexForward;
pub use fra::ForwardRateAgreement;
pub use future::InterestRateFuture;
