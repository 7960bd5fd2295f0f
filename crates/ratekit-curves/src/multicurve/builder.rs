//! Builder for [`MulticurveProvider`].

use std::collections::BTreeMap;
use std::sync::Arc;

use ratekit_core::{Currency, FxMatrix, IborIndex};

use super::MulticurveProvider;
use crate::curve::YieldCurve;
use crate::error::{CurveError, CurveResult};

/// Builder for a [`MulticurveProvider`].
///
/// Curves are registered by name. A curve can be attached to a currency, to
/// an index, to both, or to several indices; routing to an existing curve by
/// name avoids registering it twice. Validation happens in
/// [`build`](Self::build).
///
/// # Example
///
/// ```rust
/// use ratekit_core::{Currency, IborIndex};
/// use ratekit_curves::{MulticurveProviderBuilder, YieldCurve};
///
/// let euribor = IborIndex::new("EURIBOR 6M", Currency::EUR, 6);
/// let provider = MulticurveProviderBuilder::new()
///     .discounting_curve(Currency::EUR, YieldCurve::flat("EUR-SINGLE", 0.015).unwrap())
///     .forward_by_name(euribor.clone(), "EUR-SINGLE")
///     .build()
///     .unwrap();
///
/// assert_eq!(provider.forward_curve_name(&euribor).unwrap(), "EUR-SINGLE");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MulticurveProviderBuilder {
    base: Option<MulticurveProvider>,
    curves: Vec<YieldCurve>,
    discounting: Vec<(Currency, String)>,
    forwards: Vec<(IborIndex, String)>,
    fx: Option<FxMatrix>,
}

impl MulticurveProviderBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing provider; its curves and routes are kept.
    #[must_use]
    pub fn from_provider(provider: &MulticurveProvider) -> Self {
        Self {
            base: Some(provider.clone()),
            ..Self::default()
        }
    }

    /// Registers a curve without routing anything to it.
    #[must_use]
    pub fn curve(mut self, curve: YieldCurve) -> Self {
        self.curves.push(curve);
        self
    }

    /// Registers a curve and uses it to discount a currency.
    #[must_use]
    pub fn discounting_curve(mut self, currency: Currency, curve: YieldCurve) -> Self {
        self.discounting.push((currency, curve.name().to_string()));
        self.curves.push(curve);
        self
    }

    /// Registers a curve and uses it to forward an index.
    #[must_use]
    pub fn forward_curve(mut self, index: IborIndex, curve: YieldCurve) -> Self {
        self.forwards.push((index, curve.name().to_string()));
        self.curves.push(curve);
        self
    }

    /// Discounts a currency with a curve registered elsewhere in the builder.
    #[must_use]
    pub fn discounting_by_name(mut self, currency: Currency, name: impl Into<String>) -> Self {
        self.discounting.push((currency, name.into()));
        self
    }

    /// Forwards an index with a curve registered elsewhere in the builder.
    #[must_use]
    pub fn forward_by_name(mut self, index: IborIndex, name: impl Into<String>) -> Self {
        self.forwards.push((index, name.into()));
        self
    }

    /// Sets the FX matrix.
    #[must_use]
    pub fn fx_matrix(mut self, fx: FxMatrix) -> Self {
        self.fx = Some(fx);
        self
    }

    /// Builds the provider.
    ///
    /// # Errors
    ///
    /// - `CurveError::DuplicateCurve` if two different curves share a name
    /// - `CurveError::CurveNotFound` if a route names an unknown curve
    /// - `CurveError::InvalidValue` if a currency or index is routed twice to
    ///   different curves
    pub fn build(self) -> CurveResult<MulticurveProvider> {
        let base = self.base.unwrap_or_default();
        let mut curves: BTreeMap<String, Arc<YieldCurve>> = base.curves;
        for curve in self.curves {
            match curves.get(curve.name()) {
                Some(existing) if existing.as_ref() == &curve => {}
                Some(_) => {
                    return Err(CurveError::DuplicateCurve {
                        name: curve.name().to_string(),
                    })
                }
                None => {
                    curves.insert(curve.name().to_string(), Arc::new(curve));
                }
            }
        }

        let discounting = Self::routes(base.discounting, self.discounting, &curves)?;
        let forwards = Self::routes(base.forwards, self.forwards, &curves)?;

        Ok(MulticurveProvider {
            curves,
            discounting,
            forwards,
            fx: self.fx.unwrap_or(base.fx),
        })
    }

    fn routes<K>(
        mut existing: BTreeMap<K, String>,
        added: Vec<(K, String)>,
        curves: &BTreeMap<String, Arc<YieldCurve>>,
    ) -> CurveResult<BTreeMap<K, String>>
    where
        K: Ord + std::fmt::Display,
    {
        for (key, name) in added {
            if !curves.contains_key(&name) {
                return Err(CurveError::curve_not_found(name));
            }
            match existing.get(&key) {
                Some(current) if current != &name => {
                    return Err(CurveError::invalid_value(format!(
                        "{key} already routed to curve {current}, cannot route to {name}"
                    )));
                }
                _ => {
                    existing.insert(key, name);
                }
            }
        }
        Ok(existing)
    }
}
