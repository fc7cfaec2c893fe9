//! Fee evaluation.
//!
//! Fees are evaluated in three passes so that percentage fees can refer to
//! amounts produced by earlier passes:
//!
//! 1. every non-percentage fee;
//! 2. percentage fees on `subtotal` or `subtotal_with_fees` (subtotal plus pass 1);
//! 3. percentage fees on `total` (subtotal plus passes 1 and 2).
//!
//! The returned lines keep the order the fees were configured in.

use super::PricingError;
use crate::domain::fee::{ChargeType, Fee, PercentageBasis, ThresholdMode};
use crate::domain::money::{apply_basis_points, checked_sum};
use crate::domain::quote::FeeLine;

/// Stay figures fees are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeContext<'a> {
    pub currency: &'a str,
    pub subtotal_cents: i64,
    pub units: i64,
    pub guests: i64,
}

/// Fees that apply to the stay: active mandatory ones plus the requested
/// optional ones.
pub fn select_fees<'a>(
    fees: &'a [Fee],
    optional_fee_ids: &[i32],
) -> Result<Vec<&'a Fee>, PricingError> {
    for id in optional_fee_ids {
        let known = fees
            .iter()
            .any(|fee| fee.id == *id && fee.is_active && !fee.is_mandatory);
        if !known {
            return Err(PricingError::UnknownOptionalFee(*id));
        }
    }

    Ok(fees
        .iter()
        .filter(|fee| fee.is_active)
        .filter(|fee| fee.is_mandatory || optional_fee_ids.contains(&fee.id))
        .collect())
}

fn pass_of(fee: &Fee) -> u8 {
    match (fee.charge_type, fee.percentage_basis.unwrap_or(PercentageBasis::Subtotal)) {
        (ChargeType::Percentage, PercentageBasis::Total) => 3,
        (ChargeType::Percentage, _) => 2,
        _ => 1,
    }
}

/// Reduce `value` by `threshold` in excess mode, or gate it in all-or-nothing
/// mode. `None` means the fee is not charged.
///
/// Thresholds are validated non-negative on input, so the reduction cannot
/// overflow for stored fees.
fn past_threshold(
    value: i64,
    threshold: Option<i64>,
    mode: ThresholdMode,
    reducible: bool,
) -> Option<i64> {
    let Some(threshold) = threshold else {
        return Some(value);
    };

    if value <= threshold {
        return None;
    }

    match mode {
        ThresholdMode::Excess if reducible => value.checked_sub(threshold),
        _ => Some(value),
    }
}

/// Amount charged for a single fee, or `None` when a threshold is not met.
fn charge(
    fee: &Fee,
    context: &FeeContext<'_>,
    percentage_base: i64,
) -> Result<Option<i64>, PricingError> {
    let mode = fee.threshold_mode;
    let per_unit = matches!(fee.charge_type, ChargeType::PerUnit | ChargeType::PerPersonPerUnit);
    let per_person = matches!(
        fee.charge_type,
        ChargeType::PerPerson | ChargeType::PerPersonPerUnit
    );
    let is_percentage = fee.charge_type == ChargeType::Percentage;

    let Some(units) = past_threshold(
        context.units,
        fee.applies_after_quantity.map(i64::from),
        mode,
        per_unit,
    ) else {
        return Ok(None);
    };
    let Some(guests) = past_threshold(
        context.guests,
        fee.applies_after_persons.map(i64::from),
        mode,
        per_person,
    ) else {
        return Ok(None);
    };
    let amount_subject = if is_percentage {
        percentage_base
    } else {
        context.subtotal_cents
    };
    let Some(base) = past_threshold(
        amount_subject,
        fee.applies_after_amount_cents,
        mode,
        is_percentage,
    ) else {
        return Ok(None);
    };

    let amount = || fee.amount_cents.ok_or(PricingError::MissingFeeAmount(fee.id));
    let charged = match fee.charge_type {
        ChargeType::Percentage => {
            let rate = fee.rate_bp.ok_or(PricingError::MissingFeeRate(fee.id))?;
            apply_basis_points(base, i64::from(rate))
        }
        ChargeType::PerBooking => Some(amount()?),
        ChargeType::PerUnit => amount()?.checked_mul(units),
        ChargeType::PerPerson => amount()?.checked_mul(guests),
        ChargeType::PerPersonPerUnit => amount()?
            .checked_mul(guests)
            .and_then(|per_unit| per_unit.checked_mul(units)),
    };

    charged.map(Some).ok_or(PricingError::AmountOverflow)
}

/// Evaluate the selected fees against the stay.
pub fn evaluate_fees(
    fees: &[&Fee],
    context: &FeeContext<'_>,
) -> Result<Vec<FeeLine>, PricingError> {
    for fee in fees {
        if fee.currency != context.currency {
            return Err(PricingError::CurrencyMismatch {
                fee_id: fee.id,
                fee_currency: fee.currency.clone(),
                currency: context.currency.to_string(),
            });
        }
    }

    let mut amounts: Vec<Option<i64>> = vec![None; fees.len()];
    let mut pass_totals = [0_i64; 3];

    for pass in 1..=3_u8 {
        let percentage_base = match pass {
            2 => Some(context.subtotal_cents),
            3 => checked_sum([context.subtotal_cents, pass_totals[0], pass_totals[1]]),
            _ => Some(0),
        }
        .ok_or(PricingError::AmountOverflow)?;

        for (index, fee) in fees.iter().enumerate() {
            if pass_of(fee) != pass {
                continue;
            }

            let base = match fee.percentage_basis {
                Some(PercentageBasis::SubtotalWithFees) if pass == 2 => percentage_base
                    .checked_add(pass_totals[0])
                    .ok_or(PricingError::AmountOverflow)?,
                _ => percentage_base,
            };

            if let Some(amount) = charge(fee, context, base)? {
                let total = &mut pass_totals[usize::from(pass - 1)];
                *total = total.checked_add(amount).ok_or(PricingError::AmountOverflow)?;
                amounts[index] = Some(amount);
            }
        }
    }

    Ok(fees
        .iter()
        .zip(amounts)
        .filter_map(|(fee, amount)| {
            amount.map(|amount_cents| FeeLine {
                fee_id: fee.id,
                name: fee.name.clone(),
                fee_type: fee.fee_type,
                charge_type: fee.charge_type,
                amount_cents,
                is_taxable: fee.is_taxable,
                is_refundable: fee.is_refundable,
            })
        })
        .collect())
}
