//! Property-based tests for the pricing invariants.
//!
//! - Adjoint sensitivities match central finite differences
//! - Cash-flow equivalents reprice the leg they replicate
//! - Cash-flow equivalent times are strictly ascending
//! - Present value and sensitivity are additive over swap legs

use proptest::prelude::*;
use ratekit_core::{Currency, IborIndex};
use ratekit_curves::prelude::*;
use ratekit_instruments::prelude::*;
use ratekit_pricing::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

const DSC: &str = "USD-OIS";
const FWD: &str = "USD-LIBOR-3M";
const DSC_TIMES: [f64; 4] = [0.5, 1.0, 2.0, 5.0];
const FWD_TIMES: [f64; 4] = [0.25, 1.0, 3.0, 7.0];
const NOTIONAL: f64 = 1_000_000.0;

fn libor() -> IborIndex {
    IborIndex::new("USD LIBOR 3M", Currency::USD, 3)
}

fn fixing(start: f64, end: f64) -> IborFixing {
    IborFixing::new(libor(), start, start, end, end - start).unwrap()
}

fn build_provider(dsc: &[f64], fwd: &[f64], rate_time: bool) -> MulticurveProvider {
    let method = if rate_time {
        InterpolationMethod::LinearRateTime
    } else {
        InterpolationMethod::Linear
    };
    MulticurveProviderBuilder::new()
        .discounting_curve(
            Currency::USD,
            YieldCurve::new(DSC, DSC_TIMES.to_vec(), dsc.to_vec(), method).unwrap(),
        )
        .forward_curve(
            libor(),
            YieldCurve::new(FWD, FWD_TIMES.to_vec(), fwd.to_vec(), method).unwrap(),
        )
        .build()
        .unwrap()
}

#[derive(Debug, Clone, Copy)]
enum Variant {
    Fixed(f64),
    Ibor,
    Spread(f64),
    Gearing(f64, f64),
    Compounding(f64),
}

fn variant_strategy() -> impl Strategy<Value = Variant> {
    prop_oneof![
        (0.0..0.06).prop_map(Variant::Fixed),
        Just(Variant::Ibor),
        (-0.01..0.02).prop_map(Variant::Spread),
        ((0.5..2.0), (-0.01..0.01)).prop_map(|(factor, spread)| Variant::Gearing(factor, spread)),
        (-0.01..0.01).prop_map(Variant::Compounding),
    ]
}

fn coupon(variant: Variant, start: f64, notional: f64) -> Payment {
    let end = start + 0.25;
    match variant {
        Variant::Fixed(rate) => CouponFixed::new(Currency::USD, end, 0.25, notional, rate).unwrap().into(),
        Variant::Ibor => CouponIbor::new(Currency::USD, end, 0.25, notional, fixing(start, end))
            .unwrap()
            .into(),
        Variant::Spread(spread) => {
            CouponIborSpread::new(Currency::USD, end, 0.25, notional, fixing(start, end), spread)
                .unwrap()
                .into()
        }
        Variant::Gearing(factor, spread) => {
            CouponIborGearing::new(Currency::USD, end, 0.25, notional, fixing(start, end), factor, spread)
                .unwrap()
                .into()
        }
        Variant::Compounding(spread) => {
            let periods = (0..3)
                .map(|i| {
                    let s = start + f64::from(i) / 12.0;
                    CompoundingPeriod::new(fixing(s, s + 1.0 / 12.0), 1.0 / 12.0).unwrap()
                })
                .collect();
            CouponIborCompounding::new(Currency::USD, end, 0.25, notional, periods, spread)
                .unwrap()
                .into()
        }
    }
}

fn leg(variant: Variant, first: u32, count: u32, notional: f64) -> Annuity {
    Annuity::from_payments((first..first + count).map(|i| coupon(variant, 0.25 * f64::from(i), notional))).unwrap()
}

fn rates_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.005..0.06, 4)
}

fn present_value(derivative: &InstrumentDerivative, provider: &MulticurveProvider) -> f64 {
    derivative
        .accept(&PresentValueCalculator, provider)
        .unwrap()
        .amount(Currency::USD)
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_adjoint_matches_finite_difference(
        dsc in rates_strategy(),
        fwd in rates_strategy(),
        rate_time in any::<bool>(),
        variant in variant_strategy(),
        first in 0u32..12,
        count in 1u32..8,
    ) {
        let provider = build_provider(&dsc, &fwd, rate_time);
        let derivative: InstrumentDerivative = leg(variant, first, count, NOTIONAL).into();
        let analytic = ParameterSensitivityCalculator::new(PresentValueCurveSensitivityCalculator)
            .calculate(&derivative, &provider)
            .unwrap();

        let h = 1e-6;
        for curve in [DSC, FWD] {
            for node in 0..4 {
                let up = bump_node(&provider, curve, node, h).unwrap();
                let down = bump_node(&provider, curve, node, -h).unwrap();
                let fd = (present_value(&derivative, &up) - present_value(&derivative, &down)) / (2.0 * h);
                let an = analytic.get(curve, Currency::USD).map_or(0.0, |v| v[node]);
                prop_assert!(
                    (fd - an).abs() <= 1e-6 * fd.abs().max(an.abs()) + 1e-3,
                    "{:?} {} node {}: analytic {} vs finite difference {}", variant, curve, node, an, fd
                );
            }
        }
    }

    #[test]
    fn test_cash_flow_equivalent_reprices_leg(
        dsc in rates_strategy(),
        fwd in rates_strategy(),
        variant in variant_strategy(),
        first in 0u32..12,
        count in 1u32..8,
    ) {
        let provider = build_provider(&dsc, &fwd, false);
        let derivative: InstrumentDerivative = leg(variant, first, count, NOTIONAL).into();
        let equivalent = derivative.accept(&CashFlowEquivalentCalculator, &provider).unwrap();
        let replicated: InstrumentDerivative = equivalent.to_annuity().unwrap().into();

        let expected = present_value(&derivative, &provider);
        let actual = present_value(&replicated, &provider);
        prop_assert!((expected - actual).abs() <= 1e-9 * expected.abs().max(1.0));
    }

    #[test]
    fn test_cash_flow_equivalent_times_strictly_ascending(
        fwd in rates_strategy(),
        fixed_variant in (0.0..0.06).prop_map(Variant::Fixed),
        float_variant in variant_strategy(),
        first in 0u32..8,
        count in 1u32..12,
        overlap in 0u32..4,
    ) {
        let provider = build_provider(&[0.01, 0.015, 0.02, 0.025], &fwd, false);
        // Legs share payment times on the overlap.
        let swap: InstrumentDerivative = SwapMultileg::new(vec![
            leg(fixed_variant, first, count, -NOTIONAL),
            leg(float_variant, first + overlap, count, NOTIONAL),
            leg(float_variant, first, overlap + 1, NOTIONAL / 2.0),
        ])
        .unwrap()
        .into();

        let equivalent = swap.accept(&CashFlowEquivalentCalculator, &provider).unwrap();
        let times: Vec<f64> = equivalent.times().collect();
        prop_assert!(!times.is_empty());
        prop_assert!(times.windows(2).all(|w| w[0] < w[1]), "{:?}", times);
    }

    #[test]
    fn test_swap_is_additive_over_legs(
        dsc in rates_strategy(),
        fwd in rates_strategy(),
        fixed_rate in 0.0..0.06,
        float_variant in variant_strategy(),
        count in 1u32..12,
    ) {
        let provider = build_provider(&dsc, &fwd, true);
        let first_leg = leg(Variant::Fixed(fixed_rate), 0, count, -NOTIONAL);
        let second_leg = leg(float_variant, 0, count, NOTIONAL);
        let swap: InstrumentDerivative = Swap::new(first_leg.clone(), second_leg.clone()).into();
        let first_leg: InstrumentDerivative = first_leg.into();
        let second_leg: InstrumentDerivative = second_leg.into();

        let pv_swap = present_value(&swap, &provider);
        let pv_legs = present_value(&first_leg, &provider) + present_value(&second_leg, &provider);
        prop_assert!((pv_swap - pv_legs).abs() <= 1e-9 * NOTIONAL);

        let sens = |d: &InstrumentDerivative| {
            d.accept(&PresentValueCurveSensitivityCalculator, &provider).unwrap()
        };
        let swap_sensitivity = sens(&swap).sensitivity(Currency::USD);
        let leg_sensitivity = (sens(&first_leg) + sens(&second_leg)).sensitivity(Currency::USD);
        prop_assert!(swap_sensitivity.max_difference(&leg_sensitivity) <= 1e-9 * NOTIONAL);
    }
}

#[test]
fn test_gamma_is_symmetric_for_swap() {
    let provider = build_provider(&[0.01, 0.012, 0.018, 0.024], &[0.015, 0.02, 0.026, 0.03], false);
    let swap: InstrumentDerivative = Swap::new(
        leg(Variant::Fixed(0.02), 0, 20, -NOTIONAL),
        leg(Variant::Spread(0.001), 0, 20, NOTIONAL),
    )
    .into();

    let gamma = GammaCalculator::new(GammaConfig::default().with_shift(1e-6))
        .unwrap()
        .cross_curve(&swap, &provider)
        .unwrap();
    let m = gamma.matrix();
    let asymmetry = (m - m.transpose()).amax();
    assert!(asymmetry <= 1e-4 * m.amax().max(1.0), "asymmetry {asymmetry}");
}
