use serde::{Deserialize, Serialize};

/// Sensitivity to one simply compounded forward rate.
///
/// `value` is `∂PV/∂F` where `F = (DF(start)/DF(end) - 1) / accrual` on the
/// curve the entry is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardSensitivity {
    start: f64,
    end: f64,
    accrual: f64,
    value: f64,
}

impl ForwardSensitivity {
    /// Creates a forward sensitivity.
    #[must_use]
    pub fn new(start: f64, end: f64, accrual: f64, value: f64) -> Self {
        Self {
            start,
            end,
            accrual,
            value,
        }
    }

    /// Start of the forward period.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End of the forward period.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Accrual fraction of the forward.
    #[must_use]
    pub fn accrual(&self) -> f64 {
        self.accrual
    }

    /// `∂PV/∂F`.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns a copy with the value multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            value: self.value * factor,
            ..*self
        }
    }

    /// Returns true when both entries describe the same forward period.
    #[must_use]
    pub fn same_period(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.accrual == other.accrual
    }

    /// Returns `(∂F/∂r(start), ∂F/∂r(end))` for zero rates `r`, given the
    /// discount factors at both ends of the period.
    ///
    /// With `DF(t) = exp(-r(t)·t)`:
    ///
    /// ```text
    /// ∂F/∂r(start) = -start · DF(start) / (DF(end) · accrual)
    /// ∂F/∂r(end)   =    end · DF(start) / (DF(end) · accrual)
    /// ```
    #[must_use]
    pub fn rate_derivatives(&self, df_start: f64, df_end: f64) -> (f64, f64) {
        let ratio = df_start / (df_end * self.accrual);
        (-self.start * ratio, self.end * ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rate_derivatives_match_finite_difference() {
        let (start, end, accrual) = (1.0, 1.5, 0.5);
        let forward = |rs: f64, re: f64| {
            ((-rs * start).exp() / (-re * end).exp() - 1.0) / accrual
        };
        let (rs, re) = (0.02, 0.025);
        let point = ForwardSensitivity::new(start, end, accrual, 1.0);
        let (d_start, d_end) = point.rate_derivatives((-rs * start).exp(), (-re * end).exp());

        let h = 1e-6;
        let fd_start = (forward(rs + h, re) - forward(rs - h, re)) / (2.0 * h);
        let fd_end = (forward(rs, re + h) - forward(rs, re - h)) / (2.0 * h);
        assert_relative_eq!(d_start, fd_start, max_relative = 1e-7);
        assert_relative_eq!(d_end, fd_end, max_relative = 1e-7);
    }
}
