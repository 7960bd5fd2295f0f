//! Second-order node sensitivities by finite difference of the analytic
//! parameter sensitivity.
//!
//! Each node is bumped by [`GammaConfig::shift`], the parameter sensitivity
//! is recomputed on the bumped provider and `(bumped - base) / shift` becomes
//! one column of the Hessian.
//!
//! Two variants are provided:
//!
//! | Method | Result |
//! |--------|--------|
//! | [`GammaCalculator::intra_curve`] | one matrix per curve, cross-curve terms ignored |
//! | [`GammaCalculator::cross_curve`] | one matrix over every node of every curve |
//!
//! Cross-curve gamma requires a single-currency provider in which no curve
//! is shared. With the `parallel` feature the bump loop runs on `rayon`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use ratekit_core::Currency;
use ratekit_curves::bumping::bump_node;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::InstrumentDerivative;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PricingError, PricingResult};
use crate::parameter_sensitivity::ParameterSensitivityCalculator;
use crate::sensitivity::MultipleCurrencyParameterSensitivity;

/// Smallest admissible shift in absolute value.
pub const MIN_SHIFT: f64 = 1e-10;

fn default_shift() -> f64 {
    1e-4
}

/// Configuration of the gamma bump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaConfig {
    /// Node shift in zero-rate units.
    #[serde(default = "default_shift")]
    pub shift: f64,
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self { shift: default_shift() }
    }
}

impl GammaConfig {
    /// Sets the node shift.
    #[must_use]
    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
        self
    }

    /// Checks that the shift is finite and larger than [`MIN_SHIFT`].
    pub fn validate(&self) -> PricingResult<()> {
        if !self.shift.is_finite() || self.shift.abs() <= MIN_SHIFT {
            return Err(PricingError::invalid_input(format!(
                "gamma shift {} must exceed {MIN_SHIFT} in absolute value",
                self.shift
            )));
        }
        Ok(())
    }
}

/// Cross-curve Hessian with its node layout.
///
/// Curves appear in name order; nodes of one curve are contiguous and
/// ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossGamma {
    currency: Currency,
    curves: Vec<(String, usize)>,
    matrix: DMatrix<f64>,
}

impl CrossGamma {
    /// Currency of the sensitivities.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Curve names and node counts, in matrix order.
    #[must_use]
    pub fn curves(&self) -> &[(String, usize)] {
        &self.curves
    }

    /// The full Hessian.
    #[must_use]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Row/column of a curve node.
    #[must_use]
    pub fn index_of(&self, curve: &str, node: usize) -> Option<usize> {
        let mut offset = 0;
        for (name, nodes) in &self.curves {
            if name == curve {
                return (node < *nodes).then_some(offset + node);
            }
            offset += nodes;
        }
        None
    }

    /// Sub-matrix between two curves: rows of `first`, columns of `second`.
    #[must_use]
    pub fn block(&self, first: &str, second: &str) -> Option<DMatrix<f64>> {
        let (row, rows) = self.span(first)?;
        let (col, cols) = self.span(second)?;
        Some(self.matrix.view((row, col), (rows, cols)).into_owned())
    }

    fn span(&self, curve: &str) -> Option<(usize, usize)> {
        let n = self.curves.iter().find(|(name, _)| name == curve)?.1;
        Some((self.index_of(curve, 0)?, n))
    }
}

/// Finite-difference gamma calculator.
#[derive(Debug, Clone, Default)]
pub struct GammaCalculator {
    config: GammaConfig,
    parameter: ParameterSensitivityCalculator,
}

impl GammaCalculator {
    /// Creates a calculator.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidInput` if the shift is too small.
    pub fn new(config: GammaConfig) -> PricingResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            parameter: ParameterSensitivityCalculator::default(),
        })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &GammaConfig {
        &self.config
    }

    /// One Hessian per curve of the provider.
    pub fn intra_curve(
        &self,
        derivative: &InstrumentDerivative,
        provider: &MulticurveProvider,
    ) -> PricingResult<BTreeMap<String, DMatrix<f64>>> {
        let currency = single_currency(derivative, "intra-curve gamma")?;
        let base = self.parameter.calculate(derivative, provider)?;

        let mut result = BTreeMap::new();
        for name in provider.curve_names() {
            let layout = vec![(name.to_string(), provider.curve(name)?.number_of_parameters())];
            debug!(curve = name, nodes = layout[0].1, shift = self.config.shift, "intra-curve gamma");
            let matrix = self.hessian(derivative, provider, &layout, &base, currency)?;
            result.insert(name.to_string(), matrix);
        }
        Ok(result)
    }

    /// One Hessian over every node of every curve.
    ///
    /// # Errors
    ///
    /// - `PricingError::MixedCurrencies` if the curves or the instrument span
    ///   several currencies.
    /// - `PricingError::CurveAliasing` if a curve backs several indices or
    ///   two names share one curve.
    pub fn cross_curve(
        &self,
        derivative: &InstrumentDerivative,
        provider: &MulticurveProvider,
    ) -> PricingResult<CrossGamma> {
        let currency = single_currency(derivative, "cross-curve gamma")?;
        check_currencies(provider, currency)?;
        check_aliasing(provider)?;

        let layout = provider
            .curve_names()
            .map(|name| Ok((name.to_string(), provider.curve(name)?.number_of_parameters())))
            .collect::<PricingResult<Vec<_>>>()?;
        let total: usize = layout.iter().map(|(_, n)| n).sum();
        debug!(curves = layout.len(), nodes = total, shift = self.config.shift, "cross-curve gamma");

        let base = self.parameter.calculate(derivative, provider)?;
        let matrix = self.hessian(derivative, provider, &layout, &base, currency)?;
        Ok(CrossGamma {
            currency,
            curves: layout,
            matrix,
        })
    }

    fn hessian(
        &self,
        derivative: &InstrumentDerivative,
        provider: &MulticurveProvider,
        layout: &[(String, usize)],
        base: &MultipleCurrencyParameterSensitivity,
        currency: Currency,
    ) -> PricingResult<DMatrix<f64>> {
        let nodes: Vec<(&str, usize)> = layout
            .iter()
            .flat_map(|(name, n)| (0..*n).map(move |node| (name.as_str(), node)))
            .collect();
        let base = stacked(base, layout, currency);
        let shift = self.config.shift;

        let column = |&(curve, node): &(&str, usize)| -> PricingResult<DVector<f64>> {
            let bumped = bump_node(provider, curve, node, shift)?;
            let sensitivity = self.parameter.calculate(derivative, &bumped)?;
            Ok((stacked(&sensitivity, layout, currency) - &base) / shift)
        };

        #[cfg(feature = "parallel")]
        let columns: Vec<DVector<f64>> = {
            use rayon::prelude::*;
            nodes.par_iter().map(column).collect::<PricingResult<_>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let columns: Vec<DVector<f64>> = nodes.iter().map(column).collect::<PricingResult<_>>()?;

        let mut matrix = DMatrix::zeros(nodes.len(), nodes.len());
        for (k, col) in columns.iter().enumerate() {
            matrix.set_column(k, col);
        }
        Ok(matrix)
    }
}

/// Concatenates the sensitivities of `layout` in one currency; absent
/// curves contribute zeros.
fn stacked(
    sensitivity: &MultipleCurrencyParameterSensitivity,
    layout: &[(String, usize)],
    currency: Currency,
) -> DVector<f64> {
    let total = layout.iter().map(|(_, n)| n).sum();
    let mut result = DVector::zeros(total);
    let mut offset = 0;
    for (name, n) in layout {
        if let Some(vector) = sensitivity.get(name, currency) {
            result.rows_mut(offset, *n).copy_from(vector);
        }
        offset += n;
    }
    result
}

fn single_currency(derivative: &InstrumentDerivative, operation: &'static str) -> PricingResult<Currency> {
    let mut currencies = derivative.currencies().into_iter();
    match (currencies.next(), currencies.next()) {
        (Some(currency), None) => Ok(currency),
        (None, _) => Err(PricingError::invalid_input(format!(
            "{operation} of an instrument without cash flows"
        ))),
        _ => Err(PricingError::MultipleCurrencies { operation }),
    }
}

fn check_currencies(provider: &MulticurveProvider, currency: Currency) -> PricingResult<()> {
    let mut currencies: BTreeSet<Currency> = provider
        .curve_names()
        .flat_map(|name| provider.curve_currencies(name))
        .collect();
    currencies.insert(currency);
    if currencies.len() > 1 {
        return Err(PricingError::MixedCurrencies {
            currencies: currencies.into_iter().collect(),
        });
    }
    Ok(())
}

fn check_aliasing(provider: &MulticurveProvider) -> PricingResult<()> {
    let names: Vec<&str> = provider.curve_names().collect();
    for (i, name) in names.iter().enumerate() {
        let indices = provider.indices_of(name);
        if indices.len() > 1 {
            return Err(PricingError::CurveAliasing {
                curve: (*name).to_string(),
                aliases: indices.iter().map(|index| index.name().to_string()).collect(),
            });
        }
        let handle = provider.curve_handle(name)?;
        let shared: Vec<String> = names[i + 1..]
            .iter()
            .filter(|other| {
                provider
                    .curve_handle(other)
                    .is_ok_and(|h| Arc::ptr_eq(h, handle))
            })
            .map(|other| (*other).to_string())
            .collect();
        if !shared.is_empty() {
            return Err(PricingError::CurveAliasing {
                curve: (*name).to_string(),
                aliases: shared,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::test_support::{fixing, provider, DSC, FWD};
    use approx::assert_relative_eq;
    use ratekit_core::IborIndex;
    use ratekit_curves::{MulticurveProviderBuilder, YieldCurve};
    use ratekit_instruments::{Annuity, CouponFixed, CouponIbor, PaymentFixed, Swap};

    fn swap() -> InstrumentDerivative {
        let fixed = Annuity::from_payments(
            (1..=4).map(|i| CouponFixed::new(Currency::USD, f64::from(i), 1.0, -1e6, 0.02).unwrap()),
        )
        .unwrap();
        let float = Annuity::from_payments((0..16).map(|i| {
            let start = 0.25 * f64::from(i);
            CouponIbor::new(Currency::USD, start + 0.25, 0.25, 1e6, fixing(start)).unwrap()
        }))
        .unwrap();
        Swap::new(fixed, float).into()
    }

    #[test]
    fn test_config_validation() {
        assert!(GammaConfig::default().validate().is_ok());
        assert!(GammaConfig::default().with_shift(1e-12).validate().is_err());
        assert!(GammaConfig::default().with_shift(-1e-4).validate().is_ok());
        assert!(GammaCalculator::new(GammaConfig::default().with_shift(0.0)).is_err());
        let parsed: GammaConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, GammaConfig::default());
    }

    #[test]
    fn test_cross_gamma_layout_and_symmetry() {
        let provider = provider();
        let gamma = GammaCalculator::new(GammaConfig::default().with_shift(1e-6))
            .unwrap()
            .cross_curve(&swap(), &provider)
            .unwrap();

        assert_eq!(gamma.currency(), Currency::USD);
        assert_eq!(gamma.curves()[0], (DSC.to_string(), 5));
        assert_eq!(gamma.curves()[1], (FWD.to_string(), 4));
        assert_eq!(gamma.matrix().shape(), (9, 9));
        assert_eq!(gamma.index_of(FWD, 2), Some(7));
        assert_eq!(gamma.index_of(FWD, 4), None);

        let m = gamma.matrix();
        let scale = m.amax().max(1.0);
        for i in 0..9 {
            for j in 0..9 {
                assert!((m[(i, j)] - m[(j, i)]).abs() / scale < 1e-4, "({i}, {j})");
            }
        }
    }

    #[test]
    fn test_intra_curve_blocks_match_cross_curve() {
        let provider = provider();
        let calculator = GammaCalculator::default();
        let intra = calculator.intra_curve(&swap(), &provider).unwrap();
        let cross = calculator.cross_curve(&swap(), &provider).unwrap();
        for curve in [DSC, FWD] {
            let block = cross.block(curve, curve).unwrap();
            assert_relative_eq!(intra[curve], block, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fixed_payment_gamma_is_diagonal() {
        // PV = A exp(-r t) at a node: d2PV/dr2 = t^2 PV.
        let provider = provider();
        let payment: InstrumentDerivative = PaymentFixed::new(Currency::USD, 2.0, 1e6).unwrap().into();
        let gamma = GammaCalculator::new(GammaConfig::default().with_shift(1e-6))
            .unwrap()
            .intra_curve(&payment, &provider)
            .unwrap();
        let df = provider.discount_factor(Currency::USD, 2.0).unwrap();
        assert_relative_eq!(gamma[DSC][(2, 2)], 4.0 * 1e6 * df, max_relative = 1e-4);
        assert_relative_eq!(gamma[DSC][(0, 0)], 0.0);
        assert_eq!(gamma[FWD].amax(), 0.0);
    }

    #[test]
    fn test_mixed_currency_provider_fails() {
        let provider = MulticurveProviderBuilder::from_provider(&provider())
            .discounting_curve(Currency::EUR, YieldCurve::flat("EUR-ESTR", 0.01).unwrap())
            .build()
            .unwrap();
        let err = GammaCalculator::default().cross_curve(&swap(), &provider).unwrap_err();
        assert!(matches!(err, PricingError::MixedCurrencies { .. }));
    }

    #[test]
    fn test_aliased_curve_fails() {
        let provider = MulticurveProviderBuilder::from_provider(&provider())
            .forward_by_name(IborIndex::new("USD LIBOR 6M", Currency::USD, 6), FWD)
            .build()
            .unwrap();
        let err = GammaCalculator::default().cross_curve(&swap(), &provider).unwrap_err();
        assert!(matches!(err, PricingError::CurveAliasing { ref curve, .. } if curve == FWD));
    }

    #[test]
    fn test_cross_currency_instrument_fails() {
        let provider = provider();
        let fx: InstrumentDerivative = ratekit_instruments::ForexForward::new(
            PaymentFixed::new(Currency::USD, 1.0, 1.0).unwrap(),
            PaymentFixed::new(Currency::EUR, 1.0, -1.0).unwrap(),
        )
        .unwrap()
        .into();
        let err = GammaCalculator::default().cross_curve(&fx, &provider).unwrap_err();
        assert!(matches!(err, PricingError::MultipleCurrencies { .. }));
    }
}
