//! Interpolation methods for yield curves.

use serde::{Deserialize, Serialize};

/// Interpolation methods for yield curves.
///
/// Both methods extrapolate the zero rate flat beyond the first and last node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMethod {
    /// Linear interpolation on zero rates.
    #[default]
    Linear,

    /// Linear interpolation on `r·t`, i.e. log-linear discount factors and
    /// piecewise constant instantaneous forwards between nodes.
    LinearRateTime,
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Linear => "Linear",
            Self::LinearRateTime => "Linear Rate-Time",
        };
        write!(f, "{name}")
    }
}
