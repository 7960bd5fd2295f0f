//! Discounting formulas per instrument, each with its adjoint.
//!
//! [`DiscountingMethod`] pairs the present value of a leaf instrument with
//! its curve sensitivity, so a new instrument cannot be priced without also
//! being differentiated. Sensitivities are computed by a backward sweep
//! through the present value formula with the output adjoint seeded at 1.
//!
//! Curves are parametrised by zero rates, so every discount factor feeding a
//! present value contributes a discounting entry `(t, -t · DF(t) · dfBar)`.

pub mod compounding;
pub mod deposit;
pub mod fixed;
pub mod forex;
pub mod fra;
pub mod future;
pub mod ibor;
pub mod swap;

use ratekit_core::{Currency, MultipleCurrencyAmount};
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::IborFixing;

use crate::error::PricingResult;
use crate::sensitivity::{ForwardSensitivity, MulticurveSensitivity, MultipleCurrencyMulticurveSensitivity};

/// Present value of an instrument by discounting, with its adjoint.
pub trait DiscountingMethod {
    /// Present value per currency.
    fn present_value(&self, provider: &MulticurveProvider) -> PricingResult<MultipleCurrencyAmount>;

    /// Curve sensitivity of [`present_value`](Self::present_value).
    fn present_value_curve_sensitivity(
        &self,
        provider: &MulticurveProvider,
    ) -> PricingResult<MultipleCurrencyMulticurveSensitivity>;
}

/// Discounting entry for a term `dfBar · DF(t)` on the curve discounting
/// `currency`.
pub(crate) fn discounting_sensitivity(
    provider: &MulticurveProvider,
    currency: Currency,
    time: f64,
    df: f64,
    df_bar: f64,
) -> PricingResult<MulticurveSensitivity> {
    let curve = provider.discounting_curve_name(currency)?;
    Ok(MulticurveSensitivity::of_discounting(
        curve,
        vec![(time, -time * df * df_bar)],
    ))
}

/// Forward entry for a term `forwardBar · F` on the curve forwarding the
/// fixing's index.
pub(crate) fn forward_sensitivity(
    provider: &MulticurveProvider,
    fixing: &IborFixing,
    forward_bar: f64,
) -> PricingResult<MulticurveSensitivity> {
    let curve = provider.forward_curve_name(fixing.index())?;
    Ok(MulticurveSensitivity::of_forward(
        curve,
        vec![ForwardSensitivity::new(
            fixing.start(),
            fixing.end(),
            fixing.accrual(),
            forward_bar,
        )],
    ))
}

/// Forward rate of a fixing.
pub(crate) fn forward_rate(provider: &MulticurveProvider, fixing: &IborFixing) -> PricingResult<f64> {
    Ok(provider.forward_rate(fixing.index(), fixing.start(), fixing.end(), fixing.accrual())?)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared market data for method tests.

    use ratekit_core::{Currency, IborIndex};
    use ratekit_curves::{InterpolationMethod, MulticurveProvider, MulticurveProviderBuilder, YieldCurve};
    use ratekit_instruments::IborFixing;

    use crate::sensitivity::MulticurveSensitivity;

    pub const DSC: &str = "USD-OIS";
    pub const FWD: &str = "USD-LIBOR-3M";

    pub fn libor3m() -> IborIndex {
        IborIndex::new("USD LIBOR 3M", Currency::USD, 3)
    }

    pub fn fixing(start: f64) -> IborFixing {
        IborFixing::new(libor3m(), start, start, start + 0.25, 0.25).unwrap()
    }

    pub fn provider() -> MulticurveProvider {
        let dsc = YieldCurve::new(
            DSC,
            vec![0.5, 1.0, 2.0, 5.0, 10.0],
            vec![0.010, 0.012, 0.015, 0.020, 0.024],
            InterpolationMethod::Linear,
        )
        .unwrap();
        let fwd = YieldCurve::new(
            FWD,
            vec![0.25, 1.0, 3.0, 7.0],
            vec![0.018, 0.020, 0.024, 0.027],
            InterpolationMethod::LinearRateTime,
        )
        .unwrap();
        MulticurveProviderBuilder::new()
            .discounting_curve(Currency::USD, dsc)
            .forward_curve(libor3m(), fwd)
            .build()
            .unwrap()
    }

    /// Directional derivative of `f` along the zero rate of `curve` at
    /// every node, contracted with the sensitivity pushed onto the same
    /// nodes.
    pub fn check_against_bumps<F>(provider: &MulticurveProvider, sensitivity: &MulticurveSensitivity, f: F)
    where
        F: Fn(&MulticurveProvider) -> f64,
    {
        let analytic = crate::parameter_sensitivity::curve_parameter_sensitivities(sensitivity, provider)
            .unwrap();
        for curve in [DSC, FWD] {
            let nodes = provider.curve(curve).unwrap().number_of_parameters();
            for node in 0..nodes {
                let h = 1e-6;
                let up = ratekit_curves::bumping::bump_node(provider, curve, node, h).unwrap();
                let down = ratekit_curves::bumping::bump_node(provider, curve, node, -h).unwrap();
                let fd = (f(&up) - f(&down)) / (2.0 * h);
                let an = analytic.get(curve).map_or(0.0, |v| v[node]);
                let scale = fd.abs().max(an.abs()).max(1.0);
                assert!(
                    (fd - an).abs() / scale < 1e-6,
                    "curve {curve} node {node}: analytic {an} vs finite difference {fd}"
                );
            }
        }
    }
}
