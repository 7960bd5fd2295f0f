//! Broyden quasi-Newton vector root finder.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

use super::VectorRootFinderConfig;
use crate::error::MathError;
use crate::linear_algebra::{solve, DecompositionMethod};

/// Result of a successful vector root search.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRootResult {
    /// The root found.
    pub root: DVector<f64>,
    /// Number of iterations performed.
    pub iterations: u32,
    /// Residual norm `‖f(root)‖`.
    pub residual: f64,
    /// Number of analytic Jacobian evaluations.
    pub jacobian_evaluations: u32,
}

/// Broyden's method with an analytic initial Jacobian.
///
/// Each iteration solves `J Δx = -f(x)` with the configured decomposition,
/// backtracks on the step length until the residual norm decreases, then
/// applies the rank-one update
///
/// ```text
/// J ← J + (Δf - J Δx) Δxᵀ / (Δxᵀ Δx)
/// ```
///
/// When the line search or the linear solve fails on an updated Jacobian,
/// or the step stalls while the residual is still above the absolute
/// tolerance, the analytic Jacobian is recomputed at the current point and
/// the iteration is retried. A failure on a freshly computed Jacobian is
/// final. A root is only accepted once `‖f(x)‖` is below the absolute
/// tolerance.
///
/// # Example
///
/// ```rust
/// use nalgebra::{DMatrix, DVector};
/// use ratekit_math::{MathError, solvers::BroydenVectorRootFinder};
///
/// // x² = 4, x·y = 6
/// let f = |x: &DVector<f64>| -> Result<DVector<f64>, MathError> {
///     Ok(DVector::from_vec(vec![x[0] * x[0] - 4.0, x[0] * x[1] - 6.0]))
/// };
/// let jac = |x: &DVector<f64>| -> Result<DMatrix<f64>, MathError> {
///     Ok(DMatrix::from_row_slice(2, 2, &[2.0 * x[0], 0.0, x[1], x[0]]))
/// };
///
/// let result = BroydenVectorRootFinder::default()
///     .find_root(f, jac, DVector::from_vec(vec![1.0, 1.0]))
///     .unwrap();
/// assert!((result.root[0] - 2.0).abs() < 1e-6);
/// assert!((result.root[1] - 3.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BroydenVectorRootFinder {
    config: VectorRootFinderConfig,
    decomposition: DecompositionMethod,
}

impl BroydenVectorRootFinder {
    /// Creates a root finder.
    #[must_use]
    pub fn new(config: VectorRootFinderConfig, decomposition: DecompositionMethod) -> Self {
        Self {
            config,
            decomposition,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &VectorRootFinderConfig {
        &self.config
    }

    /// Returns the decomposition used for the Newton steps.
    #[must_use]
    pub fn decomposition(&self) -> DecompositionMethod {
        self.decomposition
    }

    /// Finds `x` such that `f(x) = 0`.
    ///
    /// `f` and `jacobian` may fail with any error convertible from
    /// [`MathError`]; such errors abort the search unchanged.
    ///
    /// # Errors
    ///
    /// - `MathError::ConvergenceFailed` if the iteration cap is reached, or
    ///   if no descent step exists or the step stalls from a fresh Jacobian
    /// - `MathError::SingularMatrix` if a fresh Jacobian cannot be solved
    /// - `MathError::DimensionMismatch` if `f` is not square in `x`
    pub fn find_root<F, J, E>(
        &self,
        mut f: F,
        mut jacobian: J,
        initial_guess: DVector<f64>,
    ) -> Result<VectorRootResult, E>
    where
        F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
        J: FnMut(&DVector<f64>) -> Result<DMatrix<f64>, E>,
        E: From<MathError>,
    {
        self.config.validate()?;
        let cfg = &self.config;

        let mut x = initial_guess;
        let mut y = f(&x)?;
        check_finite(&y, "initial function value")?;
        if y.len() != x.len() {
            return Err(MathError::DimensionMismatch {
                rows1: y.len(),
                cols1: 1,
                rows2: x.len(),
                cols2: 1,
            }
            .into());
        }

        let mut jac = jacobian(&x)?;
        let mut jacobian_evaluations = 1;
        let mut fresh = true;

        for iteration in 1..=cfg.max_iterations {
            let residual = y.norm();
            if residual < cfg.absolute_tolerance {
                return Ok(self.finish(x, iteration - 1, residual, jacobian_evaluations));
            }

            let rhs = -&y;
            let dx = match solve(&jac, &rhs, self.decomposition) {
                Ok(dx) => dx,
                Err(err) if !fresh => {
                    trace!(iteration, error = %err, "stale Jacobian unsolvable, refreshing");
                    jac = jacobian(&x)?;
                    jacobian_evaluations += 1;
                    fresh = true;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let Some((x_new, y_new)) = self.line_search(&mut f, &x, &dx, residual)? else {
                if fresh {
                    return Err(MathError::convergence_failed(iteration, residual).into());
                }
                trace!(iteration, residual, "line search failed, refreshing Jacobian");
                jac = jacobian(&x)?;
                jacobian_evaluations += 1;
                fresh = true;
                continue;
            };

            let step = &x_new - &x;
            let dy = &y_new - &y;
            let new_residual = y_new.norm();
            trace!(iteration, residual = new_residual, step = step.norm(), "Broyden step");

            let small_step =
                step.norm() < cfg.relative_tolerance * (1.0 + x_new.norm());
            x = x_new;
            y = y_new;
            if new_residual < cfg.absolute_tolerance {
                return Ok(self.finish(x, iteration, new_residual, jacobian_evaluations));
            }
            if small_step {
                if fresh {
                    debug!(iteration, residual = new_residual, "Broyden step stalled above tolerance");
                    return Err(MathError::convergence_failed(iteration, new_residual).into());
                }
                trace!(iteration, residual = new_residual, "step stalled, refreshing Jacobian");
                jac = jacobian(&x)?;
                jacobian_evaluations += 1;
                fresh = true;
                continue;
            }

            let denom = step.dot(&step);
            if denom > 0.0 {
                let correction = (dy - &jac * &step) / denom;
                jac += correction * step.transpose();
                fresh = false;
            }
        }

        let residual = y.norm();
        debug!(
            iterations = cfg.max_iterations,
            residual, "Broyden root finder hit iteration cap"
        );
        Err(MathError::convergence_failed(cfg.max_iterations, residual).into())
    }

    /// Halves the step until the residual norm decreases.
    fn line_search<F, E>(
        &self,
        f: &mut F,
        x: &DVector<f64>,
        dx: &DVector<f64>,
        residual: f64,
    ) -> Result<Option<(DVector<f64>, DVector<f64>)>, E>
    where
        F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
    {
        let mut lambda = 1.0;
        for _ in 0..=self.config.max_backtracks {
            let candidate = x + dx * lambda;
            let value = f(&candidate)?;
            if value.iter().all(|v| v.is_finite()) && value.norm() < residual {
                return Ok(Some((candidate, value)));
            }
            lambda *= 0.5;
        }
        Ok(None)
    }

    fn finish(
        &self,
        root: DVector<f64>,
        iterations: u32,
        residual: f64,
        jacobian_evaluations: u32,
    ) -> VectorRootResult {
        debug!(
            iterations,
            residual,
            jacobian_evaluations,
            decomposition = %self.decomposition,
            "Broyden root finder converged"
        );
        VectorRootResult {
            root,
            iterations,
            residual,
            jacobian_evaluations,
        }
    }
}

fn check_finite(values: &DVector<f64>, operation: &str) -> Result<(), MathError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(MathError::NonFinite {
            operation: operation.to_string(),
        })
    }
}
