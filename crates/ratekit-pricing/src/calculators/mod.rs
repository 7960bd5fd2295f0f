//! Calculators dispatched over instruments.
//!
//! Every calculator is a stateless unit struct implementing
//! [`InstrumentVisitor`](ratekit_instruments::InstrumentVisitor). Those that
//! need market data take a [`MulticurveProvider`](ratekit_curves::MulticurveProvider)
//! as context; those that do not take `()`, so calling a market-data
//! calculator without curves does not compile.
//!
//! | Calculator | Context | Output |
//! |------------|---------|--------|
//! | [`PresentValueCalculator`] | provider | amount per currency |
//! | [`PresentValueCurveSensitivityCalculator`] | provider | curve sensitivity per currency |
//! | [`ParRateCalculator`] | provider | par rate |
//! | [`ParRateCurveSensitivityCalculator`] | provider | curve sensitivity of the par rate |
//! | [`ParSpreadMarketQuoteCalculator`] | provider | quote adjustment to par |
//! | [`PresentValueCouponSensitivityCalculator`] | provider | `∂PV/∂coupon` |
//! | [`CashFlowEquivalentCalculator`] | provider | fixed cash flows (multi-curve) |
//! | [`TheoreticalCashFlowEquivalentCalculator`] | `()` | fixed cash flows (single curve) |
//! | [`LastTimeCalculator`] | `()` | last cash-flow or fixing time |

mod cash_flow_equivalent;
mod coupon_sensitivity;
mod curve_sensitivity;
mod last_time;
mod par_rate;
mod par_spread;
mod present_value;

pub use cash_flow_equivalent::{
    CashFlowEquivalent, CashFlowEquivalentCalculator, TheoreticalCashFlowEquivalentCalculator,
};
pub use coupon_sensitivity::PresentValueCouponSensitivityCalculator;
pub use curve_sensitivity::PresentValueCurveSensitivityCalculator;
pub use last_time::LastTimeCalculator;
pub use par_rate::{ParRateCalculator, ParRateCurveSensitivityCalculator};
pub use par_spread::ParSpreadMarketQuoteCalculator;
pub use present_value::PresentValueCalculator;
