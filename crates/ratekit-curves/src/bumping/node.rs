//! Single-node bumps.

use super::MulticurveProvider;
use crate::error::CurveResult;

/// A shift of one node zero rate of one curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBump {
    node: usize,
    shift: f64,
}

impl NodeBump {
    /// Creates a bump of `shift` (decimal) on node `node`.
    #[must_use]
    pub fn new(node: usize, shift: f64) -> Self {
        Self { node, shift }
    }

    /// Returns the bumped node index.
    #[must_use]
    pub fn node(&self) -> usize {
        self.node
    }

    /// Returns the shift as a decimal rate.
    #[must_use]
    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// Applies the bump to the named curve of a provider.
    pub fn apply(&self, provider: &MulticurveProvider, curve: &str) -> CurveResult<MulticurveProvider> {
        bump_node(provider, curve, self.node, self.shift)
    }
}

/// Shifts one node of a named curve by `shift` (decimal).
pub fn bump_node(
    provider: &MulticurveProvider,
    curve: &str,
    node: usize,
    shift: f64,
) -> CurveResult<MulticurveProvider> {
    let bumped = provider.curve(curve)?.with_bumped_node(node, shift)?;
    provider.with_replaced_curve(bumped)
}
