//! Swap-level quantities built from leg present values.

use ratekit_core::Currency;
use ratekit_curves::MulticurveProvider;
use ratekit_instruments::{Annuity, InstrumentVisitor, Payment, Swap};

use crate::calculators::{PresentValueCalculator, PresentValueCurveSensitivityCalculator};
use crate::error::{PricingError, PricingResult};
use crate::sensitivity::MulticurveSensitivity;

use super::discounting_sensitivity;

/// `(notional, accrual)` of a coupon; `None` for coupon-less payments.
fn coupon_basis(payment: &Payment) -> Option<(f64, f64)> {
    match payment {
        Payment::Fixed(_) => None,
        Payment::CouponFixed(c) => Some((c.notional(), c.payment_accrual())),
        Payment::CouponIbor(c) => Some((c.notional(), c.payment_accrual())),
        Payment::CouponIborSpread(c) => Some((c.notional(), c.coupon().payment_accrual())),
        Payment::CouponIborGearing(c) => Some((c.notional(), c.coupon().payment_accrual())),
        Payment::CouponIborCompounding(c) => Some((c.notional(), c.payment_accrual())),
    }
}

fn basis(payment: &Payment) -> PricingResult<(f64, f64)> {
    coupon_basis(payment).ok_or_else(|| PricingError::unsupported("PresentValueBasisPoint", payment.type_name()))
}

/// Present value of one basis point (as a unit rate) on every coupon of a
/// leg: `Σ N_i · a_i · DF(t_i)`.
pub fn present_value_basis_point(annuity: &Annuity, provider: &MulticurveProvider) -> PricingResult<f64> {
    annuity.payments().iter().try_fold(0.0, |acc, payment| {
        let (notional, accrual) = basis(payment)?;
        let df = provider.discount_factor(payment.currency(), payment.payment_time())?;
        Ok(acc + notional * accrual * df)
    })
}

/// Curve sensitivity of [`present_value_basis_point`].
pub fn present_value_basis_point_curve_sensitivity(
    annuity: &Annuity,
    provider: &MulticurveProvider,
) -> PricingResult<MulticurveSensitivity> {
    annuity
        .payments()
        .iter()
        .try_fold(MulticurveSensitivity::new(), |acc, payment| {
            let (notional, accrual) = basis(payment)?;
            let df = provider.discount_factor(payment.currency(), payment.payment_time())?;
            Ok(acc.plus(discounting_sensitivity(
                provider,
                payment.currency(),
                payment.payment_time(),
                df,
                notional * accrual,
            )?))
        })
}

fn single_currency(swap: &Swap, operation: &'static str) -> PricingResult<Currency> {
    swap.currency()
        .ok_or(PricingError::MultipleCurrencies { operation })
}

fn check_fixed_first_leg(swap: &Swap) -> PricingResult<()> {
    if swap.first_leg().fixed_coupons().is_none() {
        return Err(PricingError::invalid_input(
            "swap par rate needs a first leg of fixed coupons",
        ));
    }
    Ok(())
}

fn leg_present_value(leg: &Annuity, currency: Currency, provider: &MulticurveProvider) -> PricingResult<f64> {
    Ok(PresentValueCalculator.visit_annuity(leg, provider)?.amount(currency))
}

/// Fixed rate making the swap worthless: `-PV(second leg) / PVBP(first leg)`.
///
/// # Errors
///
/// Fails for two-currency swaps and when the first leg is not a leg of
/// fixed coupons.
pub fn par_rate(swap: &Swap, provider: &MulticurveProvider) -> PricingResult<f64> {
    let currency = single_currency(swap, "swap par rate")?;
    check_fixed_first_leg(swap)?;
    let pv_other = leg_present_value(swap.second_leg(), currency, provider)?;
    let pvbp = present_value_basis_point(swap.first_leg(), provider)?;
    Ok(-pv_other / pvbp)
}

/// Curve sensitivity of [`par_rate`].
pub fn par_rate_curve_sensitivity(swap: &Swap, provider: &MulticurveProvider) -> PricingResult<MulticurveSensitivity> {
    let currency = single_currency(swap, "swap par rate")?;
    check_fixed_first_leg(swap)?;
    let pv_other = leg_present_value(swap.second_leg(), currency, provider)?;
    let pvbp = present_value_basis_point(swap.first_leg(), provider)?;
    // Backward sweep
    let rate_bar = 1.0;
    let pv_other_bar = -rate_bar / pvbp;
    let pvbp_bar = pv_other / (pvbp * pvbp) * rate_bar;

    let pv_other_sensitivity = PresentValueCurveSensitivityCalculator
        .visit_annuity(swap.second_leg(), provider)?
        .sensitivity(currency);
    let pvbp_sensitivity = present_value_basis_point_curve_sensitivity(swap.first_leg(), provider)?;
    Ok(pv_other_sensitivity
        .multiplied_by(pv_other_bar)
        .plus(pvbp_sensitivity.multiplied_by(pvbp_bar)))
}

/// Spread to add to every coupon of the first leg to make the swap
/// worthless: `-PV(swap) / PVBP(first leg)`.
pub fn par_spread(swap: &Swap, provider: &MulticurveProvider) -> PricingResult<f64> {
    let currency = single_currency(swap, "swap par spread")?;
    let pv = leg_present_value(swap.first_leg(), currency, provider)?
        + leg_present_value(swap.second_leg(), currency, provider)?;
    let pvbp = present_value_basis_point(swap.first_leg(), provider)?;
    Ok(-pv / pvbp)
}
