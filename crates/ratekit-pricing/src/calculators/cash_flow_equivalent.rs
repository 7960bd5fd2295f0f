//! Replication of instruments by deterministic fixed cash flows.
//!
//! A floating coupon `N · a · F` on a fixing `[s, e]` with accrual `δ` is
//! replicated by a synthetic deposit:
//!
//! - single curve (theoretical): `+N·a/δ` at `s` and `-N·a/δ` at the payment
//!   time
//! - multi-curve: `+N·a/δ · β` at `s` and `-N·a/δ` at the payment time, with
//!   the discount-factor ratio correction `β = (1 + δF) · DF(tp) / DF(s)`
//!   between the forward and the discounting curve
//!
//! The two are distinct operations under different modelling assumptions and
//! agree when forward and discounting curves coincide and the coupon pays at
//! the end of its fixing period.

use ratekit_core::Currency;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::{
    Annuity, Cash, CouponFixed, CouponIbor, CouponIborCompounding, CouponIborGearing, CouponIborSpread,
    ForexForward, ForwardRateAgreement, InstrumentVisitor, InterestRateFuture, PaymentFixed,
};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};
use crate::methods::{compounding, forward_rate, fra};

/// A time-ordered list of fixed cash flows in one currency.
///
/// Times are strictly ascending and unique: adding a flow at an existing
/// time adds to its amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEquivalent {
    currency: Currency,
    flows: Vec<(f64, f64)>,
}

impl CashFlowEquivalent {
    /// An empty cash-flow list.
    #[must_use]
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            flows: Vec::new(),
        }
    }

    /// A single cash flow.
    #[must_use]
    pub fn single(currency: Currency, time: f64, amount: f64) -> Self {
        Self::new(currency).with_flow(time, amount)
    }

    /// Builds a list from `(time, amount)` pairs in any order.
    #[must_use]
    pub fn from_flows(currency: Currency, flows: impl IntoIterator<Item = (f64, f64)>) -> Self {
        flows
            .into_iter()
            .fold(Self::new(currency), |acc, (time, amount)| acc.with_flow(time, amount))
    }

    /// Adds an amount at a time.
    pub fn add_flow(&mut self, time: f64, amount: f64) {
        match self
            .flows
            .binary_search_by(|(t, _)| t.total_cmp(&time))
        {
            Ok(i) => self.flows[i].1 += amount,
            Err(i) => self.flows.insert(i, (time, amount)),
        }
    }

    /// Returns a copy with an amount added at a time.
    #[must_use]
    pub fn with_flow(mut self, time: f64, amount: f64) -> Self {
        self.add_flow(time, amount);
        self
    }

    /// Merges two lists, summing amounts at equal times.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::MultipleCurrencies` if the currencies differ.
    pub fn merged(mut self, other: Self) -> PricingResult<Self> {
        if self.currency != other.currency {
            return Err(PricingError::MultipleCurrencies {
                operation: "cash-flow equivalent",
            });
        }
        for (time, amount) in other.flows {
            self.add_flow(time, amount);
        }
        Ok(self)
    }

    /// Returns the currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the `(time, amount)` pairs in ascending time order.
    #[must_use]
    pub fn flows(&self) -> &[(f64, f64)] {
        &self.flows
    }

    /// Returns the times.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.flows.iter().map(|(t, _)| *t)
    }

    /// Returns the amounts.
    pub fn amounts(&self) -> impl Iterator<Item = f64> + '_ {
        self.flows.iter().map(|(_, a)| *a)
    }

    /// Number of distinct times.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Returns true when there are no flows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Converts the flows into a leg of fixed payments, so the replication
    /// can be priced like any instrument.
    pub fn to_annuity(&self) -> PricingResult<Annuity> {
        let payments = self
            .flows
            .iter()
            .map(|(time, amount)| PaymentFixed::new(self.currency, *time, *amount))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Annuity::from_payments(payments)?)
    }
}

/// Replication `g·N·a/δ` at `start` and `-g·N·a/δ` at the payment time,
/// with the start amount scaled by `beta`.
fn ibor_replication(coupon: &CouponIbor, factor: f64, beta: f64) -> CashFlowEquivalent {
    let fixing = coupon.fixing();
    let amount = factor * coupon.notional() * coupon.payment_accrual() / fixing.accrual();
    CashFlowEquivalent::from_flows(
        coupon.currency(),
        [
            (fixing.start(), amount * beta),
            (coupon.payment_time(), -amount),
        ],
    )
}

/// Single-curve cash-flow equivalent. Needs no market data.
///
/// Futures have no deterministic schedule and compounded coupons are not
/// linear in the discount factors, so both are unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct TheoreticalCashFlowEquivalentCalculator;

impl InstrumentVisitor for TheoreticalCashFlowEquivalentCalculator {
    type Output = CashFlowEquivalent;
    type Error = PricingError;

    fn name(&self) -> &'static str {
        "TheoreticalCashFlowEquivalentCalculator"
    }

    fn combine(&self, left: Self::Output, right: Self::Output) -> PricingResult<Self::Output> {
        left.merged(right)
    }

    fn visit_payment_fixed(&self, payment: &PaymentFixed, _: &()) -> PricingResult<Self::Output> {
        Ok(CashFlowEquivalent::single(
            payment.currency(),
            payment.payment_time(),
            payment.amount(),
        ))
    }

    fn visit_coupon_fixed(&self, coupon: &CouponFixed, _: &()) -> PricingResult<Self::Output> {
        Ok(CashFlowEquivalent::single(
            coupon.currency(),
            coupon.payment_time(),
            coupon.amount(),
        ))
    }

    fn visit_coupon_ibor(&self, coupon: &CouponIbor, _: &()) -> PricingResult<Self::Output> {
        Ok(ibor_replication(coupon, 1.0, 1.0))
    }

    fn visit_coupon_ibor_spread(&self, coupon: &CouponIborSpread, _: &()) -> PricingResult<Self::Output> {
        Ok(ibor_replication(coupon.coupon(), 1.0, 1.0)
            .with_flow(coupon.payment_time(), coupon.spread_amount()))
    }

    fn visit_coupon_ibor_gearing(&self, coupon: &CouponIborGearing, _: &()) -> PricingResult<Self::Output> {
        Ok(ibor_replication(coupon.coupon(), coupon.factor(), 1.0)
            .with_flow(coupon.payment_time(), coupon.spread_amount()))
    }

    fn visit_coupon_ibor_compounding(&self, _: &CouponIborCompounding, _: &()) -> PricingResult<Self::Output> {
        Err(PricingError::unsupported(self.name(), "CouponIborCompounding"))
    }

    fn visit_cash(&self, cash: &Cash, _: &()) -> PricingResult<Self::Output> {
        let repaid = cash.notional() * (1.0 + cash.rate() * cash.accrual());
        Ok(CashFlowEquivalent::from_flows(
            cash.currency(),
            [(cash.start_time(), -cash.notional()), (cash.end_time(), repaid)],
        ))
    }

    /// Settled at the start of the fixing period, a FRA is `+N` at the start
    /// and `-N · (1 + a·K)` at the end of the period.
    fn visit_forward_rate_agreement(&self, fra: &ForwardRateAgreement, _: &()) -> PricingResult<Self::Output> {
        let fixing = fra.fixing();
        Ok(CashFlowEquivalent::from_flows(
            fra.currency(),
            [
                (fixing.start(), fra.notional()),
                (
                    fixing.end(),
                    -fra.notional() * (1.0 + fra.payment_accrual() * fra.rate()),
                ),
            ],
        ))
    }

    fn visit_interest_rate_future(&self, _: &InterestRateFuture, _: &()) -> PricingResult<Self::Output> {
        Err(PricingError::unsupported(self.name(), "InterestRateFuture"))
    }

    fn visit_forex_forward(&self, _: &ForexForward, _: &()) -> PricingResult<Self::Output> {
        Err(PricingError::MultipleCurrencies {
            operation: "cash-flow equivalent",
        })
    }
}

/// Multi-curve cash-flow equivalent.
///
/// Replicates floating coupons with the discount-factor ratio correction,
/// and replaces FRAs and compounded coupons by their forward-implied
/// settlement amount. The replication always has the present value of the
/// instrument under the provider it was built with.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashFlowEquivalentCalculator;

impl CashFlowEquivalentCalculator {
    fn ibor(&self, coupon: &CouponIbor, factor: f64, provider: &MulticurveProvider) -> PricingResult<CashFlowEquivalent> {
        let fixing = coupon.fixing();
        let forward = forward_rate(provider, fixing)?;
        let df_start = provider.discount_factor(coupon.currency(), fixing.start())?;
        let df_payment = provider.discount_factor(coupon.currency(), coupon.payment_time())?;
        let beta = (1.0 + fixing.accrual() * forward) * df_payment / df_start;
        Ok(ibor_replication(coupon, factor, beta))
    }
}

impl InstrumentVisitor<MulticurveProvider> for CashFlowEquivalentCalculator {
    type Output = CashFlowEquivalent;
    type Error = PricingError;

    fn name(&self) -> &'static str {
        "CashFlowEquivalentCalculator"
    }

    fn combine(&self, left: Self::Output, right: Self::Output) -> PricingResult<Self::Output> {
        left.merged(right)
    }

    fn visit_payment_fixed(&self, payment: &PaymentFixed, _: &MulticurveProvider) -> PricingResult<Self::Output> {
        TheoreticalCashFlowEquivalentCalculator.visit_payment_fixed(payment, &())
    }

    fn visit_coupon_fixed(&self, coupon: &CouponFixed, _: &MulticurveProvider) -> PricingResult<Self::Output> {
        TheoreticalCashFlowEquivalentCalculator.visit_coupon_fixed(coupon, &())
    }

    fn visit_coupon_ibor(&self, coupon: &CouponIbor, provider: &MulticurveProvider) -> PricingResult<Self::Output> {
        self.ibor(coupon, 1.0, provider)
    }

    fn visit_coupon_ibor_spread(
        &self,
        coupon: &CouponIborSpread,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        Ok(self
            .ibor(coupon.coupon(), 1.0, provider)?
            .with_flow(coupon.payment_time(), coupon.spread_amount()))
    }

    fn visit_coupon_ibor_gearing(
        &self,
        coupon: &CouponIborGearing,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        Ok(self
            .ibor(coupon.coupon(), coupon.factor(), provider)?
            .with_flow(coupon.payment_time(), coupon.spread_amount()))
    }

    fn visit_coupon_ibor_compounding(
        &self,
        coupon: &CouponIborCompounding,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        Ok(CashFlowEquivalent::single(
            coupon.currency(),
            coupon.payment_time(),
            compounding::compounded_amount(coupon, provider)?,
        ))
    }

    fn visit_cash(&self, cash: &Cash, _: &MulticurveProvider) -> PricingResult<Self::Output> {
        TheoreticalCashFlowEquivalentCalculator.visit_cash(cash, &())
    }

    fn visit_forward_rate_agreement(
        &self,
        fra: &ForwardRateAgreement,
        provider: &MulticurveProvider,
    ) -> PricingResult<Self::Output> {
        Ok(CashFlowEquivalent::single(
            fra.currency(),
            fra.payment_time(),
            fra::settlement_amount(fra, provider)?,
        ))
    }

    fn visit_interest_rate_future(&self, _: &InterestRateFuture, _: &MulticurveProvider) -> PricingResult<Self::Output> {
        Err(PricingError::unsupported(self.name(), "InterestRateFuture"))
    }

    fn visit_forex_forward(&self, _: &ForexForward, _: &MulticurveProvider) -> PricingResult<Self::Output> {
        Err(PricingError::MultipleCurrencies {
            operation: "cash-flow equivalent",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::PresentValueCalculator;
    use crate::methods::test_support::{fixing, provider};
    use approx::assert_relative_eq;
    use ratekit_curves::{MulticurveProviderBuilder, YieldCurve};
    use ratekit_instruments::{InstrumentDerivative, Swap};

    fn ibor_leg(notional: f64) -> Annuity {
        Annuity::from_payments((0..8).map(|i| {
            let start = 0.25 * f64::from(i);
            CouponIbor::new(Currency::USD, start + 0.25, 0.25, notional, fixing(start))
                .unwrap()
                .with_spread(0.001)
        }))
        .unwrap()
    }

    #[test]
    fn test_flows_are_sorted_and_merged() {
        let cfe = CashFlowEquivalent::from_flows(
            Currency::USD,
            [(2.0, 1.0), (0.5, 3.0), (2.0, -4.0), (1.0, 2.0)],
        );
        assert_eq!(cfe.flows(), &[(0.5, 3.0), (1.0, 2.0), (2.0, -3.0)]);
    }

    #[test]
    fn test_leg_replication_merges_coincident_times() {
        let cfe = TheoreticalCashFlowEquivalentCalculator
            .visit_annuity(&ibor_leg(1e6), &())
            .unwrap();
        // Each period end is also the next period start.
        assert_eq!(cfe.len(), 9);
        let times: Vec<f64> = cfe.times().collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        assert_relative_eq!(cfe.flows()[0].1, 1e6);
    }

    #[test]
    fn test_multicurve_replication_reprices() {
        let provider = provider();
        let leg = ibor_leg(-1e6);
        let cfe = CashFlowEquivalentCalculator.visit_annuity(&leg, &provider).unwrap();

        let pv_leg = PresentValueCalculator.visit_annuity(&leg, &provider).unwrap();
        let pv_cfe = PresentValueCalculator
            .visit_annuity(&cfe.to_annuity().unwrap(), &provider)
            .unwrap();
        assert_relative_eq!(
            pv_cfe.amount(Currency::USD),
            pv_leg.amount(Currency::USD),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_theoretical_replication_is_exact_on_a_single_curve() {
        let curve = YieldCurve::flat("USD", 0.03).unwrap();
        let provider = MulticurveProviderBuilder::new()
            .discounting_curve(Currency::USD, curve)
            .forward_by_name(crate::methods::test_support::libor3m(), "USD")
            .build()
            .unwrap();
        let leg = ibor_leg(1e6);

        let theoretical = TheoreticalCashFlowEquivalentCalculator
            .visit_annuity(&leg, &())
            .unwrap();
        let multicurve = CashFlowEquivalentCalculator.visit_annuity(&leg, &provider).unwrap();
        for ((t1, a1), (t2, a2)) in theoretical.flows().iter().zip(multicurve.flows()) {
            assert_relative_eq!(t1, t2);
            assert_relative_eq!(a1, a2, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_unsupported_instruments_fail_loudly() {
        let provider = provider();
        let future = InterestRateFuture::new(Currency::USD, 0.9, fixing(1.0), 0.98, 1.0, 0.25, 1.0).unwrap();
        let err = InstrumentDerivative::from(future)
            .accept(&CashFlowEquivalentCalculator, &provider)
            .unwrap_err();
        assert!(matches!(err, PricingError::Unsupported { .. }));

        let eur = Annuity::from_payments(vec![
            CouponFixed::new(Currency::EUR, 1.0, 1.0, 1.0, 0.01).unwrap()
        ])
        .unwrap();
        let swap = Swap::new(ibor_leg(1.0), eur);
        let err = InstrumentDerivative::from(swap)
            .accept(&TheoreticalCashFlowEquivalentCalculator, &())
            .unwrap_err();
        assert!(matches!(err, PricingError::MultipleCurrencies { .. }));
    }
}
