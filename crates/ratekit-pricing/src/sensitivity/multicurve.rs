use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use super::ForwardSensitivity;

/// Curve-functional sensitivity of a single-currency amount.
///
/// Two independent buckets, both keyed by curve name:
///
/// - **discounting**: `(time, ∂PV/∂r(time))` pairs, `r` being the curve's
///   zero rate
/// - **forward**: [`ForwardSensitivity`] entries
///
/// The type is a vector space. [`plus`](Self::plus) concatenates entry lists
/// without collapsing equal times; [`cleaned`](Self::cleaned) collapses them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MulticurveSensitivity {
    discounting: BTreeMap<String, Vec<(f64, f64)>>,
    forward: BTreeMap<String, Vec<ForwardSensitivity>>,
}

impl MulticurveSensitivity {
    /// The zero sensitivity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensitivity with discounting entries on one curve.
    #[must_use]
    pub fn of_discounting(curve: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        let mut discounting = BTreeMap::new();
        discounting.insert(curve.into(), points);
        Self {
            discounting,
            forward: BTreeMap::new(),
        }
    }

    /// Creates a sensitivity with forward entries on one curve.
    #[must_use]
    pub fn of_forward(curve: impl Into<String>, points: Vec<ForwardSensitivity>) -> Self {
        let mut forward = BTreeMap::new();
        forward.insert(curve.into(), points);
        Self {
            discounting: BTreeMap::new(),
            forward,
        }
    }

    /// Discounting entries by curve.
    #[must_use]
    pub fn discounting(&self) -> &BTreeMap<String, Vec<(f64, f64)>> {
        &self.discounting
    }

    /// Forward entries by curve.
    #[must_use]
    pub fn forward(&self) -> &BTreeMap<String, Vec<ForwardSensitivity>> {
        &self.forward
    }

    /// Every curve with at least one entry list.
    #[must_use]
    pub fn curve_names(&self) -> BTreeSet<&str> {
        self.discounting
            .keys()
            .chain(self.forward.keys())
            .map(String::as_str)
            .collect()
    }

    /// Returns true when no curve has any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.discounting.values().all(Vec::is_empty) && self.forward.values().all(Vec::is_empty)
    }

    /// Sum of two sensitivities: entry lists are concatenated per curve.
    #[must_use]
    pub fn plus(mut self, other: Self) -> Self {
        for (curve, points) in other.discounting {
            self.discounting.entry(curve).or_default().extend(points);
        }
        for (curve, points) in other.forward {
            self.forward.entry(curve).or_default().extend(points);
        }
        self
    }

    /// Multiplies every entry by `factor`.
    #[must_use]
    pub fn multiplied_by(mut self, factor: f64) -> Self {
        for points in self.discounting.values_mut() {
            for (_, value) in points.iter_mut() {
                *value *= factor;
            }
        }
        for points in self.forward.values_mut() {
            for point in points.iter_mut() {
                *point = point.scaled(factor);
            }
        }
        self
    }

    /// Returns an equivalent sensitivity with entries sorted and entries at
    /// equal times (equal periods for forwards) summed.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        let discounting = self
            .discounting
            .iter()
            .map(|(curve, points)| {
                let mut sorted = points.clone();
                sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
                let mut merged: Vec<(f64, f64)> = Vec::with_capacity(sorted.len());
                for (time, value) in sorted {
                    match merged.last_mut() {
                        Some(last) if last.0 == time => last.1 += value,
                        _ => merged.push((time, value)),
                    }
                }
                (curve.clone(), merged)
            })
            .collect();

        let forward = self
            .forward
            .iter()
            .map(|(curve, points)| {
                let mut sorted = points.clone();
                sorted.sort_by(|a, b| {
                    a.start()
                        .total_cmp(&b.start())
                        .then(a.end().total_cmp(&b.end()))
                        .then(a.accrual().total_cmp(&b.accrual()))
                });
                let mut merged: Vec<ForwardSensitivity> = Vec::with_capacity(sorted.len());
                for point in sorted {
                    match merged.last_mut() {
                        Some(last) if last.same_period(&point) => {
                            *last = ForwardSensitivity::new(
                                last.start(),
                                last.end(),
                                last.accrual(),
                                last.value() + point.value(),
                            );
                        }
                        _ => merged.push(point),
                    }
                }
                (curve.clone(), merged)
            })
            .collect();

        Self {
            discounting,
            forward,
        }
    }

    /// Largest absolute difference between the cleaned entries of two
    /// sensitivities; `f64::INFINITY` when their structure differs.
    #[must_use]
    pub fn max_difference(&self, other: &Self) -> f64 {
        let a = self.cleaned();
        let b = other.cleaned();
        if a.curve_names() != b.curve_names() {
            return f64::INFINITY;
        }
        let mut diff = 0.0_f64;
        for (curve, points) in &a.discounting {
            let others = b.discounting.get(curve).map_or(&[][..], Vec::as_slice);
            if points.len() != others.len() {
                return f64::INFINITY;
            }
            for (p, q) in points.iter().zip(others) {
                if p.0 != q.0 {
                    return f64::INFINITY;
                }
                diff = diff.max((p.1 - q.1).abs());
            }
        }
        for (curve, points) in &a.forward {
            let others = b.forward.get(curve).map_or(&[][..], Vec::as_slice);
            if points.len() != others.len() {
                return f64::INFINITY;
            }
            for (p, q) in points.iter().zip(others) {
                if !p.same_period(q) {
                    return f64::INFINITY;
                }
                diff = diff.max((p.value() - q.value()).abs());
            }
        }
        diff
    }
}

impl Add for MulticurveSensitivity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.plus(rhs)
    }
}

impl Mul<f64> for MulticurveSensitivity {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        self.multiplied_by(rhs)
    }
}
