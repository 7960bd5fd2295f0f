//! Joint calibration of several curves from market instruments.
//!
//! All instruments of all templates form one system
//!
//! ```text
//! F(x) = [ model(instrument_i; curves(x)) - target_i ]
//! ```
//!
//! where `x` stacks the node zero rates of every template. The model is the
//! par rate (target: the quote) or the present value (target: zero). The
//! system is solved by Broyden's method seeded with the analytic Jacobian
//! `∂F/∂x`, built from the adjoint curve sensitivities projected on the
//! nodes. A numerical failure is retried once with the fallback
//! decomposition.

use std::collections::BTreeSet;

use nalgebra::{DMatrix, DVector};
use ratekit_core::Currency;
use ratekit_curves::{MulticurveProvider, MulticurveProviderBuilder, YieldCurve};
use ratekit_math::linear_algebra::{invert, DecompositionMethod};
use ratekit_math::solvers::{BroydenVectorRootFinder, VectorRootResult};
use ratekit_pricing::calculators::{
    ParRateCalculator, ParRateCurveSensitivityCalculator, PresentValueCalculator,
    PresentValueCouponSensitivityCalculator, PresentValueCurveSensitivityCalculator,
};
use ratekit_pricing::parameter_sensitivity::curve_parameter_sensitivities;
use ratekit_pricing::sensitivity::{MulticurveSensitivity, MultipleCurrencyParameterSensitivity};
use tracing::{debug, info, warn};

use crate::config::{CalibrationConfig, CalibrationMode, InitialGuess};
use crate::error::{CalibrationAttempt, CalibrationError, CalibrationResult, CalibrationStage};
use crate::template::{CalibrationInstrument, CurveTemplate, STRIKE_TOLERANCE};

/// Node times and values of one calibrated curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedCurve {
    /// Curve name.
    pub name: String,
    /// Node times, ascending.
    pub node_times: Vec<f64>,
    /// Calibrated zero rates at the nodes.
    pub node_values: Vec<f64>,
}

/// Outcome of a successful calibration.
#[derive(Debug, Clone)]
pub struct CalibratedCurves {
    /// The base provider extended with the calibrated curves.
    pub provider: MulticurveProvider,
    /// Calibrated curves in template order.
    pub curves: Vec<CalibratedCurve>,
    /// `∂F/∂x` at the solution; rows follow instruments sorted by node time
    /// within each template, columns follow nodes.
    pub jacobian: DMatrix<f64>,
    /// Inverse of [`jacobian`](Self::jacobian).
    pub inverse_jacobian: DMatrix<f64>,
    /// Residual norm at the solution.
    pub residual: f64,
    /// Root finder iterations.
    pub iterations: u32,
    /// Decomposition that produced the solution.
    pub decomposition: DecompositionMethod,
    /// Calibration mode used.
    pub mode: CalibrationMode,
    /// In present value mode, `∂PV/∂coupon` of every instrument in row
    /// order.
    pub coupon_sensitivities: Option<Vec<f64>>,
}

impl CalibratedCurves {
    /// A calibrated curve by name.
    #[must_use]
    pub fn curve(&self, name: &str) -> Option<&CalibratedCurve> {
        self.curves.iter().find(|c| c.name == name)
    }

    /// Number of nodes across all calibrated curves.
    #[must_use]
    pub fn number_of_nodes(&self) -> usize {
        self.curves.iter().map(|c| c.node_times.len()).sum()
    }

    /// Sensitivity to the market quotes, in row order, of a value whose
    /// node sensitivity is `sensitivity`.
    ///
    /// Curves not calibrated here are ignored.
    pub fn market_quote_sensitivity(
        &self,
        sensitivity: &MultipleCurrencyParameterSensitivity,
        currency: Currency,
    ) -> DVector<f64> {
        let mut stacked = DVector::zeros(self.number_of_nodes());
        let mut offset = 0;
        for curve in &self.curves {
            let n = curve.node_times.len();
            if let Some(vector) = sensitivity.get(&curve.name, currency) {
                stacked.rows_mut(offset, n).copy_from(vector);
            }
            offset += n;
        }

        // F(x, q) = 0 gives dx/dq = -J⁻¹ ∂F/∂q.
        let quote_sensitivity = self.inverse_jacobian.transpose() * stacked;
        match &self.coupon_sensitivities {
            Some(coupons) => -quote_sensitivity.component_mul(&DVector::from_column_slice(coupons)),
            None => quote_sensitivity,
        }
    }
}

/// An instrument with its node time and currency.
#[derive(Debug)]
struct Node<'a> {
    time: f64,
    instrument: &'a CalibrationInstrument,
    currency: Currency,
}

#[derive(Debug)]
struct PreparedCurve<'a> {
    template: &'a CurveTemplate,
    nodes: Vec<Node<'a>>,
    offset: usize,
}

impl PreparedCurve<'_> {
    fn times(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.time).collect()
    }

    fn curve(&self, x: &DVector<f64>) -> CalibrationResult<YieldCurve> {
        let values = x.rows(self.offset, self.nodes.len()).iter().copied().collect();
        Ok(YieldCurve::new(
            self.template.name(),
            self.times(),
            values,
            self.template.interpolation(),
        )?)
    }
}

/// In present value mode the quote only enters through the strike, so a
/// detectable strike must equal it.
fn check_strike(template: &CurveTemplate, instrument: &CalibrationInstrument) -> CalibrationResult<()> {
    match instrument.contractual_rate() {
        Some(rate) if (rate - instrument.quote).abs() > STRIKE_TOLERANCE => Err(CalibrationError::invalid_template(
            template.name(),
            format!(
                "instrument struck at {rate} but quoted at {}; present value calibration needs both equal",
                instrument.quote
            ),
        )),
        _ => Ok(()),
    }
}

/// The joint system `F(x) = 0`.
struct System<'a> {
    curves: Vec<PreparedCurve<'a>>,
    skeleton: MulticurveProvider,
    mode: CalibrationMode,
    size: usize,
}

impl<'a> System<'a> {
    fn new(templates: &'a [CurveTemplate], base: &MulticurveProvider, mode: CalibrationMode) -> CalibrationResult<Self> {
        let mut names = BTreeSet::new();
        let mut curves = Vec::with_capacity(templates.len());
        let mut offset = 0;
        for template in templates {
            if !names.insert(template.name()) {
                return Err(CalibrationError::invalid_template(template.name(), "curve appears twice"));
            }
            if base.contains_curve(template.name()) {
                return Err(CalibrationError::invalid_template(
                    template.name(),
                    "curve is already supplied by the base provider",
                ));
            }
            let nodes = template
                .nodes()?
                .into_iter()
                .map(|(time, instrument)| {
                    if mode == CalibrationMode::PresentValue {
                        check_strike(template, instrument)?;
                    }
                    let currency = instrument.derivative.currencies().into_iter().next().ok_or_else(|| {
                        CalibrationError::invalid_template(template.name(), "instrument without currency")
                    })?;
                    Ok(Node {
                        time,
                        instrument,
                        currency,
                    })
                })
                .collect::<CalibrationResult<Vec<_>>>()?;
            let n = nodes.len();
            curves.push(PreparedCurve { template, nodes, offset });
            offset += n;
        }

        let skeleton = Self::skeleton(&curves, offset, base)?;
        Ok(Self {
            curves,
            skeleton,
            mode,
            size: offset,
        })
    }

    /// The base provider with every template curve routed, at flat zero.
    fn skeleton(
        curves: &[PreparedCurve<'_>],
        size: usize,
        base: &MulticurveProvider,
    ) -> CalibrationResult<MulticurveProvider> {
        let x = DVector::zeros(size);
        let mut builder = MulticurveProviderBuilder::from_provider(base);
        for prepared in curves {
            let template = prepared.template;
            builder = builder.curve(prepared.curve(&x)?);
            if let Some(currency) = template.discounting_currency() {
                builder = builder.discounting_by_name(currency, template.name());
            }
            for index in template.indices() {
                builder = builder.forward_by_name(index.clone(), template.name());
            }
        }
        Ok(builder.build()?)
    }

    fn curve_names(&self) -> Vec<String> {
        self.curves.iter().map(|c| c.template.name().to_string()).collect()
    }

    fn nodes(&self) -> impl Iterator<Item = &Node<'a>> {
        self.curves.iter().flat_map(|c| c.nodes.iter())
    }

    fn initial_guess(&self, guess: InitialGuess) -> DVector<f64> {
        match guess {
            InitialGuess::Flat(rate) => DVector::from_element(self.size, rate),
            InitialGuess::MarketQuote => DVector::from_iterator(self.size, self.nodes().map(|n| n.instrument.quote)),
        }
    }

    fn provider(&self, x: &DVector<f64>) -> CalibrationResult<MulticurveProvider> {
        let curves = self
            .curves
            .iter()
            .map(|c| c.curve(x))
            .collect::<CalibrationResult<Vec<_>>>()?;
        Ok(self.skeleton.with_replaced_curves(curves)?)
    }

    fn residuals(&self, x: &DVector<f64>) -> CalibrationResult<DVector<f64>> {
        let provider = self.provider(x)?;
        let values = self
            .nodes()
            .map(|node| {
                let derivative = &node.instrument.derivative;
                Ok(match self.mode {
                    CalibrationMode::ParRate => {
                        derivative.accept(&ParRateCalculator, &provider)? - node.instrument.quote
                    }
                    CalibrationMode::PresentValue => derivative
                        .accept(&PresentValueCalculator, &provider)?
                        .amount(node.currency),
                })
            })
            .collect::<CalibrationResult<Vec<f64>>>()?;
        Ok(DVector::from_vec(values))
    }

    fn sensitivity(&self, node: &Node<'_>, provider: &MulticurveProvider) -> CalibrationResult<MulticurveSensitivity> {
        let derivative = &node.instrument.derivative;
        Ok(match self.mode {
            CalibrationMode::ParRate => derivative.accept(&ParRateCurveSensitivityCalculator, provider)?,
            CalibrationMode::PresentValue => derivative
                .accept(&PresentValueCurveSensitivityCalculator, provider)?
                .sensitivity(node.currency),
        })
    }

    fn jacobian(&self, x: &DVector<f64>) -> CalibrationResult<DMatrix<f64>> {
        let provider = self.provider(x)?;
        let mut jacobian = DMatrix::zeros(self.size, self.size);
        for (row, node) in self.nodes().enumerate() {
            let sensitivity = self.sensitivity(node, &provider)?;
            let by_curve = curve_parameter_sensitivities(&sensitivity, &provider)?;
            for prepared in &self.curves {
                if let Some(vector) = by_curve.get(prepared.template.name()) {
                    jacobian
                        .view_mut((row, prepared.offset), (1, vector.len()))
                        .copy_from(&vector.transpose());
                }
            }
        }
        Ok(jacobian)
    }

    fn coupon_sensitivities(&self, provider: &MulticurveProvider) -> CalibrationResult<Vec<f64>> {
        self.nodes()
            .map(|node| Ok(node.instrument.derivative.accept(&PresentValueCouponSensitivityCalculator, provider)?))
            .collect()
    }

    fn finish(&self, result: VectorRootResult, decomposition: DecompositionMethod) -> CalibrationResult<CalibratedCurves> {
        let provider = self.provider(&result.root)?;
        let jacobian = self.jacobian(&result.root)?;
        let inverse_jacobian = invert(&jacobian, decomposition)?;
        let coupon_sensitivities = match self.mode {
            CalibrationMode::ParRate => None,
            CalibrationMode::PresentValue => Some(self.coupon_sensitivities(&provider)?),
        };
        let curves = self
            .curves
            .iter()
            .map(|c| CalibratedCurve {
                name: c.template.name().to_string(),
                node_times: c.times(),
                node_values: result.root.rows(c.offset, c.nodes.len()).iter().copied().collect(),
            })
            .collect();

        Ok(CalibratedCurves {
            provider,
            curves,
            jacobian,
            inverse_jacobian,
            residual: result.residual,
            iterations: result.iterations,
            decomposition,
            mode: self.mode,
            coupon_sensitivities,
        })
    }
}

/// Multi-curve calibrator.
///
/// # Example
///
/// ```rust
/// use ratekit_calibration::prelude::*;
/// use ratekit_core::Currency;
/// use ratekit_curves::{InterpolationMethod, MulticurveProvider};
/// use ratekit_instruments::Cash;
///
/// let deposit = |end: f64, rate: f64| Cash::new(Currency::USD, 0.0, end, 1.0, rate, end).unwrap();
/// let template = CurveTemplate::new("USD-OIS", InterpolationMethod::Linear)
///     .discounting(Currency::USD)
///     .instrument(deposit(0.5, 0.02), 0.02)
///     .instrument(deposit(1.0, 0.025), 0.025);
///
/// let calibrated = MulticurveCalibrator::default()
///     .calibrate(&[template], &MulticurveProvider::default())
///     .unwrap();
/// assert_eq!(calibrated.curves[0].node_times, vec![0.5, 1.0]);
/// assert!(calibrated.residual < 1e-7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MulticurveCalibrator {
    config: CalibrationConfig,
}

impl MulticurveCalibrator {
    /// Creates a calibrator.
    #[must_use]
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Calibrates the templates jointly.
    ///
    /// Curves already in `base` are exogenous: instruments may depend on
    /// them, but their nodes are not solved for.
    ///
    /// # Errors
    ///
    /// - `CalibrationError::InvalidTemplate`, `CalibrationError::DuplicateNodeTime`
    ///   or `CalibrationError::InvalidConfig` for bad input
    /// - `CalibrationError::Pricing` if an instrument cannot be priced, e.g.
    ///   a curve it needs is neither calibrated nor in `base`
    /// - `CalibrationError::Failed` if the root search fails with every
    ///   decomposition
    pub fn calibrate(&self, templates: &[CurveTemplate], base: &MulticurveProvider) -> CalibrationResult<CalibratedCurves> {
        self.config.validate()?;
        if templates.is_empty() {
            return Err(CalibrationError::invalid_config("nothing to calibrate"));
        }

        let system = System::new(templates, base, self.config.mode)?;
        let curves = system.curve_names();
        info!(
            stage = %CalibrationStage::Setup,
            curves = ?curves,
            nodes = system.size,
            mode = ?self.config.mode,
            "calibrating curves"
        );

        let initial = system.initial_guess(self.config.initial_guess);
        let mut attempts = Vec::new();
        for decomposition in self.config.decompositions() {
            debug!(stage = %CalibrationStage::RootFind, %decomposition, "starting root search");
            let finder = BroydenVectorRootFinder::new(self.config.root_finder, decomposition);
            match finder.find_root(|x| system.residuals(x), |x| system.jacobian(x), initial.clone()) {
                Ok(result) => {
                    info!(
                        stage = %CalibrationStage::Converged,
                        %decomposition,
                        iterations = result.iterations,
                        residual = result.residual,
                        "calibration converged"
                    );
                    return system.finish(result, decomposition);
                }
                Err(CalibrationError::Math(error)) if error.is_numerical() => {
                    warn!(%decomposition, %error, "root search failed");
                    attempts.push(CalibrationAttempt { decomposition, error });
                }
                Err(error) => return Err(error),
            }
        }

        warn!(stage = %CalibrationStage::Failed, curves = ?curves, "calibration failed");
        Err(CalibrationError::Failed { curves, attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ratekit_curves::InterpolationMethod;
    use ratekit_instruments::Cash;
    use ratekit_math::solvers::VectorRootFinderConfig;

    fn deposit(end: f64, rate: f64) -> Cash {
        Cash::new(Currency::USD, 0.0, end, 1.0, rate, end).unwrap()
    }

    fn deposits() -> CurveTemplate {
        CurveTemplate::new("USD-OIS", InterpolationMethod::Linear)
            .discounting(Currency::USD)
            .instrument(deposit(0.5, 0.020), 0.020)
            .instrument(deposit(1.0, 0.022), 0.022)
            .instrument(deposit(2.0, 0.025), 0.025)
    }

    #[test]
    fn test_deposit_curve_closed_form() {
        // A deposit from 0 to T pays 1 + qT at T: r(T) = ln(1 + qT) / T.
        let calibrated = MulticurveCalibrator::default()
            .calibrate(&[deposits()], &MulticurveProvider::default())
            .unwrap();
        let curve = calibrated.curve("USD-OIS").unwrap();
        for ((t, r), q) in curve.node_times.iter().zip(&curve.node_values).zip([0.020, 0.022, 0.025]) {
            assert_relative_eq!(*r, (1.0 + q * t).ln() / t, epsilon = 1e-9);
        }
        assert!(calibrated.coupon_sensitivities.is_none());
        assert_eq!(calibrated.decomposition, DecompositionMethod::Lu);
    }

    #[test]
    fn test_jacobian_inverse() {
        let calibrated = MulticurveCalibrator::default()
            .calibrate(&[deposits()], &MulticurveProvider::default())
            .unwrap();
        let identity = &calibrated.jacobian * &calibrated.inverse_jacobian;
        assert_relative_eq!(identity, DMatrix::identity(3, 3), epsilon = 1e-9);
    }

    #[test]
    fn test_market_quote_initial_guess() {
        let config = CalibrationConfig::default().with_initial_guess(InitialGuess::MarketQuote);
        let calibrated = MulticurveCalibrator::new(config)
            .calibrate(&[deposits()], &MulticurveProvider::default())
            .unwrap();
        assert!(calibrated.residual < 1e-7);
    }

    #[test]
    fn test_failure_reports_every_attempt() {
        let config = CalibrationConfig::default()
            .with_initial_guess(InitialGuess::Flat(0.5))
            .with_root_finder(VectorRootFinderConfig::default().with_max_iterations(1));
        let err = MulticurveCalibrator::new(config)
            .calibrate(&[deposits()], &MulticurveProvider::default())
            .unwrap_err();
        match err {
            CalibrationError::Failed { curves, attempts } => {
                assert_eq!(curves, vec!["USD-OIS".to_string()]);
                assert_eq!(attempts.len(), 2);
                assert_eq!(attempts[0].decomposition, DecompositionMethod::Lu);
                assert_eq!(attempts[1].decomposition, DecompositionMethod::Svd);
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_present_value_mode_rejects_strike_off_quote() {
        let config = CalibrationConfig::default().with_mode(CalibrationMode::PresentValue);
        let template = CurveTemplate::new("USD-OIS", InterpolationMethod::Linear)
            .discounting(Currency::USD)
            .instrument(deposit(0.5, 0.020), 0.020)
            .instrument(deposit(1.0, 0.020), 0.022);
        let err = MulticurveCalibrator::new(config)
            .calibrate(&[template.clone()], &MulticurveProvider::default())
            .unwrap_err();
        assert!(matches!(err, CalibrationError::InvalidTemplate { ref curve, .. } if curve == "USD-OIS"));

        // Par rate mode reads the quote and ignores the strike.
        let calibrated = MulticurveCalibrator::default()
            .calibrate(&[template], &MulticurveProvider::default())
            .unwrap();
        assert_relative_eq!(calibrated.curves[0].node_values[1], 1.022_f64.ln(), epsilon = 1e-9);

        let calibrated = MulticurveCalibrator::new(config)
            .calibrate(&[deposits()], &MulticurveProvider::default())
            .unwrap();
        assert_eq!(calibrated.coupon_sensitivities.map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_curve_already_in_base_rejected() {
        let base = MulticurveProviderBuilder::new()
            .discounting_curve(Currency::USD, YieldCurve::flat("USD-OIS", 0.02).unwrap())
            .build()
            .unwrap();
        let err = MulticurveCalibrator::default().calibrate(&[deposits()], &base).unwrap_err();
        assert!(matches!(err, CalibrationError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_empty_templates_rejected() {
        let err = MulticurveCalibrator::default()
            .calibrate(&[], &MulticurveProvider::default())
            .unwrap_err();
        assert!(matches!(err, CalibrationError::InvalidConfig { .. }));
    }
}
