//! Curve provider for multi-curve pricing.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use ratekit_core::{Currency, FxMatrix, IborIndex};

use crate::curve::YieldCurve;
use crate::error::{CurveError, CurveResult};

/// A named set of yield curves with discounting and forward routing.
///
/// # Thread Safety
///
/// `MulticurveProvider` holds its curves in `Arc` and is immutable once
/// built, so it can be shared across threads for concurrent pricing.
///
/// # Example
///
/// ```rust
/// use ratekit_core::Currency;
/// use ratekit_curves::{MulticurveProviderBuilder, YieldCurve};
///
/// let provider = MulticurveProviderBuilder::new()
///     .discounting_curve(Currency::EUR, YieldCurve::flat("EUR-OIS", 0.01).unwrap())
///     .build()
///     .unwrap();
///
/// let bumped = provider
///     .with_replaced_curve(YieldCurve::flat("EUR-OIS", 0.0101).unwrap())
///     .unwrap();
/// assert!(bumped.discount_factor(Currency::EUR, 5.0).unwrap()
///     < provider.discount_factor(Currency::EUR, 5.0).unwrap());
/// ```
#[derive(Clone, Default)]
pub struct MulticurveProvider {
    pub(crate) curves: BTreeMap<String, Arc<YieldCurve>>,
    pub(crate) discounting: BTreeMap<Currency, String>,
    pub(crate) forwards: BTreeMap<IborIndex, String>,
    pub(crate) fx: FxMatrix,
}

impl std::fmt::Debug for MulticurveProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MulticurveProvider")
            .field("curves", &self.curves.keys().collect::<Vec<_>>())
            .field("discounting", &self.discounting)
            .field(
                "forwards",
                &self
                    .forwards
                    .iter()
                    .map(|(i, c)| (i.name(), c))
                    .collect::<Vec<_>>(),
            )
            .field("fx_base", &self.fx.base())
            .finish()
    }
}

impl MulticurveProvider {
    // ==================== Market data queries ====================

    /// Returns the discount factor for a currency at time `t`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::MissingDiscountCurve` if no curve discounts the currency.
    pub fn discount_factor(&self, currency: Currency, t: f64) -> CurveResult<f64> {
        self.discounting_curve(currency)?.discount_factor(t)
    }

    /// Returns the simply compounded forward rate of an index over
    /// `[start, end]` with the given accrual fraction.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::MissingForwardCurve` if no curve forwards the index.
    pub fn forward_rate(
        &self,
        index: &IborIndex,
        start: f64,
        end: f64,
        accrual: f64,
    ) -> CurveResult<f64> {
        self.forward_curve(index)?.forward_rate(start, end, accrual)
    }

    // ==================== Curve lookup ====================

    /// Returns the name of the curve discounting a currency.
    pub fn discounting_curve_name(&self, currency: Currency) -> CurveResult<&str> {
        self.discounting
            .get(&currency)
            .map(String::as_str)
            .ok_or(CurveError::MissingDiscountCurve { currency })
    }

    /// Returns the name of the curve forwarding an index.
    pub fn forward_curve_name(&self, index: &IborIndex) -> CurveResult<&str> {
        self.forwards
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| CurveError::MissingForwardCurve {
                index: index.clone(),
            })
    }

    /// Returns the curve discounting a currency.
    pub fn discounting_curve(&self, currency: Currency) -> CurveResult<&YieldCurve> {
        self.curve(self.discounting_curve_name(currency)?)
    }

    /// Returns the curve forwarding an index.
    pub fn forward_curve(&self, index: &IborIndex) -> CurveResult<&YieldCurve> {
        self.curve(self.forward_curve_name(index)?)
    }

    /// Returns a curve by name.
    pub fn curve(&self, name: &str) -> CurveResult<&YieldCurve> {
        self.curves
            .get(name)
            .map(Arc::as_ref)
            .ok_or_else(|| CurveError::curve_not_found(name))
    }

    /// Returns the shared handle of a curve, for identity comparisons.
    pub fn curve_handle(&self, name: &str) -> CurveResult<&Arc<YieldCurve>> {
        self.curves
            .get(name)
            .ok_or_else(|| CurveError::curve_not_found(name))
    }

    /// Returns true when a curve with this name exists.
    #[must_use]
    pub fn contains_curve(&self, name: &str) -> bool {
        self.curves.contains_key(name)
    }

    /// Returns the curve names in ascending order.
    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }

    /// Returns the curves in ascending name order.
    pub fn curves(&self) -> impl Iterator<Item = &YieldCurve> {
        self.curves.values().map(Arc::as_ref)
    }

    /// Returns the discounted currencies in ascending order.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.discounting.keys().copied()
    }

    /// Returns the forwarded indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = &IborIndex> {
        self.forwards.keys()
    }

    /// Returns the indices forwarded by a named curve.
    #[must_use]
    pub fn indices_of(&self, name: &str) -> Vec<&IborIndex> {
        self.forwards
            .iter()
            .filter(|(_, curve)| curve.as_str() == name)
            .map(|(index, _)| index)
            .collect()
    }

    /// Returns every currency a named curve is used for, either as the
    /// discounting curve or through the currency of an index it forwards.
    #[must_use]
    pub fn curve_currencies(&self, name: &str) -> BTreeSet<Currency> {
        let discounted = self
            .discounting
            .iter()
            .filter(|(_, curve)| curve.as_str() == name)
            .map(|(ccy, _)| *ccy);
        let forwarded = self
            .forwards
            .iter()
            .filter(|(_, curve)| curve.as_str() == name)
            .map(|(index, _)| index.currency());
        discounted.chain(forwarded).collect()
    }

    /// Returns the FX matrix.
    #[must_use]
    pub fn fx_matrix(&self) -> &FxMatrix {
        &self.fx
    }

    // ==================== Bumped copies ====================

    /// Returns a shallow copy with the curve of the same name replaced.
    ///
    /// Every other curve is shared with `self`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::CurveNotFound` if no curve with the replacement's
    /// name exists.
    pub fn with_replaced_curve(&self, curve: YieldCurve) -> CurveResult<Self> {
        self.with_replaced_curves(std::iter::once(curve))
    }

    /// Returns a shallow copy with several curves replaced by name.
    pub fn with_replaced_curves<I>(&self, curves: I) -> CurveResult<Self>
    where
        I: IntoIterator<Item = YieldCurve>,
    {
        let mut copy = self.clone();
        for curve in curves {
            let slot = copy
                .curves
                .get_mut(curve.name())
                .ok_or_else(|| CurveError::curve_not_found(curve.name()))?;
            *slot = Arc::new(curve);
        }
        Ok(copy)
    }

    /// Returns a copy with a different FX matrix.
    #[must_use]
    pub fn with_fx_matrix(&self, fx: FxMatrix) -> Self {
        Self {
            fx,
            ..self.clone()
        }
    }
}
