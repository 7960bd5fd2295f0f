//! Linear algebra utilities.
//!
//! Calibration Jacobians are small and dense. This module solves them with
//! either a partially pivoted LU decomposition (fast, fails on singular or
//! near-singular systems) or an SVD (slower, tolerates rank deficiency by
//! discarding small singular values).

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MathError, MathResult};

/// Relative pivot size below which an LU factorisation is declared singular.
pub const LU_PIVOT_TOLERANCE: f64 = 1e-14;

/// Relative singular value cut-off used by SVD solves.
pub const SVD_TOLERANCE: f64 = 1e-12;

/// Decomposition used to solve linear systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecompositionMethod {
    /// LU with partial pivoting.
    #[default]
    Lu,
    /// Singular value decomposition with small singular values discarded.
    Svd,
}

impl fmt::Display for DecompositionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lu => write!(f, "LU"),
            Self::Svd => write!(f, "SVD"),
        }
    }
}

fn check_square(a: &DMatrix<f64>, rhs_rows: usize) -> MathResult<()> {
    if a.nrows() != a.ncols() || a.nrows() != rhs_rows {
        return Err(MathError::DimensionMismatch {
            rows1: a.nrows(),
            cols1: a.ncols(),
            rows2: rhs_rows,
            cols2: 1,
        });
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(MathError::NonFinite {
            operation: "matrix decomposition".to_string(),
        });
    }
    Ok(())
}

fn lu_checked(a: &DMatrix<f64>) -> MathResult<nalgebra::LU<f64, nalgebra::Dyn, nalgebra::Dyn>> {
    let scale = a.amax();
    if scale == 0.0 {
        return Err(MathError::singular("zero matrix"));
    }
    let lu = a.clone().lu();
    let min_pivot = lu.u().diagonal().amin();
    if min_pivot <= LU_PIVOT_TOLERANCE * scale {
        return Err(MathError::singular(format!(
            "LU pivot {:.3e} below tolerance (scale {:.3e})",
            min_pivot, scale
        )));
    }
    Ok(lu)
}

/// Solves `A x = b` with the requested decomposition.
///
/// # Errors
///
/// Returns `MathError::SingularMatrix` when the decomposition cannot produce
/// a solution, and `MathError::DimensionMismatch` for non-square systems.
pub fn solve(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    method: DecompositionMethod,
) -> MathResult<DVector<f64>> {
    check_square(a, b.len())?;
    if a.nrows() == 0 {
        return Ok(DVector::zeros(0));
    }

    let x = match method {
        DecompositionMethod::Lu => lu_checked(a)?
            .solve(b)
            .ok_or_else(|| MathError::singular("LU solve failed"))?,
        DecompositionMethod::Svd => {
            let eps = SVD_TOLERANCE * a.amax();
            a.clone()
                .svd(true, true)
                .solve(b, eps)
                .map_err(|reason| MathError::singular(format!("SVD solve failed: {reason}")))?
        }
    };

    if x.iter().any(|v| !v.is_finite()) {
        return Err(MathError::NonFinite {
            operation: format!("{method} solve"),
        });
    }
    Ok(x)
}

/// Inverts a square matrix with the requested decomposition.
///
/// With [`DecompositionMethod::Svd`] the result is the pseudo-inverse.
pub fn invert(a: &DMatrix<f64>, method: DecompositionMethod) -> MathResult<DMatrix<f64>> {
    check_square(a, a.nrows())?;
    match method {
        DecompositionMethod::Lu => lu_checked(a)?
            .try_inverse()
            .ok_or_else(|| MathError::singular("LU inverse failed")),
        DecompositionMethod::Svd => {
            let eps = SVD_TOLERANCE * a.amax();
            a.clone()
                .svd(true, true)
                .pseudo_inverse(eps)
                .map_err(|reason| MathError::singular(format!("SVD inverse failed: {reason}")))
        }
    }
}

/// Returns the 2-norm condition number `σ_max / σ_min`.
///
/// Singular values below `1e-14` are treated as zero, giving an infinite
/// condition number.
pub fn condition_number(a: &DMatrix<f64>) -> f64 {
    if a.nrows() == 0 || a.ncols() == 0 {
        return 1.0;
    }

    let svd = a.clone().svd(false, false);
    let sigma_max = svd.singular_values.max();
    let sigma_min = svd.singular_values.min();

    if sigma_min > 1e-14 {
        sigma_max / sigma_min
    } else {
        f64::INFINITY
    }
}
