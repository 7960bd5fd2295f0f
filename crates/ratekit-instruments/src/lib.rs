//! # Ratekit Instruments
//!
//! Interest rate derivatives as immutable trees of cash flows, and the
//! dispatch mechanism every calculator is built on.
//!
//! ## Taxonomy
//!
//! **Payments** (leaves of a leg):
//! - [`PaymentFixed`]: a known amount at a time
//! - [`CouponFixed`]: notional × accrual × fixed rate
//! - [`CouponIbor`], [`CouponIborSpread`], [`CouponIborGearing`]: floating
//!   coupons on one Ibor fixing, optionally with spread and gearing
//! - [`CouponIborCompounding`]: several Ibor sub-periods compounded into one payment
//!
//! **Composites**:
//! - [`Annuity`]: an ordered leg of payments in one currency
//! - [`Swap`]: two legs
//! - [`SwapMultileg`]: any number of legs
//!
//! **Products**: [`Cash`] deposits, [`ForwardRateAgreement`]s,
//! [`InterestRateFuture`]s and [`ForexForward`]s.
//!
//! ## Dispatch
//!
//! [`InstrumentDerivative`] is a closed enum. Calculators implement
//! [`InstrumentVisitor`], whose leaf methods have no defaults: adding a
//! variant without teaching every calculator about it does not compile.
//! Composite methods default to visiting children and combining results
//! with the calculator's own [`combine`](InstrumentVisitor::combine).
//!
//! ## Time convention
//!
//! All times are year fractions from a single valuation epoch shared by the
//! whole tree, and must be non-negative.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

pub mod derivative;
pub mod error;
pub mod payments;
pub mod products;
pub mod swap;
pub mod visitor;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::derivative::InstrumentDerivative;
    pub use crate::error::{InstrumentError, InstrumentResult};
    pub use crate::payments::{
        Annuity, CompoundingPeriod, CouponFixed, CouponIbor, CouponIborCompounding,
        CouponIborGearing, CouponIborSpread, IborFixing, Payment, PaymentFixed,
    };
    pub use crate::products::{Cash, ForexForward, ForwardRateAgreement, InterestRateFuture};
    pub use crate::swap::{Swap, SwapMultileg};
    pub use crate::visitor::InstrumentVisitor;
}

pub use derivative::InstrumentDerivative;
pub use error::{InstrumentError, InstrumentResult};
pub use payments::{
    Annuity, CompoundingPeriod, CouponFixed, CouponIbor, CouponIborCompounding, CouponIborGearing,
    CouponIborSpread, IborFixing, Payment, PaymentFixed,
};
pub use products::{Cash, ForexForward, ForwardRateAgreement, InterestRateFuture};
pub use swap::{Swap, SwapMultileg};
pub use visitor::InstrumentVisitor;
