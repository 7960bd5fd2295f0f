//! Parallel curve shifts.

use super::MulticurveProvider;
use crate::error::CurveResult;

/// A parallel shift of every node zero rate of one curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallelBump {
    /// Shift in basis points.
    shift_bps: f64,
}

impl ParallelBump {
    /// Creates a parallel bump.
    ///
    /// # Arguments
    ///
    /// * `shift_bps` - Shift in basis points (1.0 = 1bp = 0.0001)
    #[must_use]
    pub fn new(shift_bps: f64) -> Self {
        Self { shift_bps }
    }

    /// Creates a +1bp bump.
    #[must_use]
    pub fn one_bp_up() -> Self {
        Self::new(1.0)
    }

    /// Creates a -1bp bump.
    #[must_use]
    pub fn one_bp_down() -> Self {
        Self::new(-1.0)
    }

    /// Returns the shift in basis points.
    #[must_use]
    pub fn shift_bps(&self) -> f64 {
        self.shift_bps
    }

    /// Returns the shift as a decimal rate.
    #[must_use]
    pub fn shift_decimal(&self) -> f64 {
        self.shift_bps / 10_000.0
    }

    /// Applies the bump to the named curve of a provider.
    pub fn apply(&self, provider: &MulticurveProvider, curve: &str) -> CurveResult<MulticurveProvider> {
        parallel_shift(provider, curve, self.shift_decimal())
    }
}

/// Shifts every node of a named curve by `shift` (decimal).
pub fn parallel_shift(
    provider: &MulticurveProvider,
    curve: &str,
    shift: f64,
) -> CurveResult<MulticurveProvider> {
    let shifted = provider.curve(curve)?.with_parallel_shift(shift)?;
    provider.with_replaced_curve(shifted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MulticurveProviderBuilder, YieldCurve};
    use approx::assert_relative_eq;
    use ratekit_core::Currency;

    #[test]
    fn test_shift_conversion() {
        assert_relative_eq!(ParallelBump::one_bp_up().shift_decimal(), 0.0001);
        assert_relative_eq!(ParallelBump::one_bp_down().shift_decimal(), -0.0001);
        assert_relative_eq!(ParallelBump::new(25.0).shift_bps(), 25.0);
    }

    #[test]
    fn test_parallel_bump_moves_every_node() {
        let curve = YieldCurve::new(
            "EUR-OIS",
            vec![1.0, 2.0, 5.0],
            vec![0.01, 0.012, 0.02],
            crate::InterpolationMethod::Linear,
        )
        .unwrap();
        let provider = MulticurveProviderBuilder::new()
            .discounting_curve(Currency::EUR, curve)
            .build()
            .unwrap();

        let bumped = ParallelBump::new(10.0).apply(&provider, "EUR-OIS").unwrap();
        let before = provider.curve("EUR-OIS").unwrap().node_values();
        let after = bumped.curve("EUR-OIS").unwrap().node_values();
        for (b, a) in before.iter().zip(after) {
            assert_relative_eq!(a - b, 0.001, epsilon = 1e-15);
        }
        assert!(ParallelBump::one_bp_up().apply(&provider, "NOPE").is_err());
    }
}
