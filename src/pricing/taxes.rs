//! Tax evaluation.

use chrono::NaiveDate;

use super::PricingError;
use crate::domain::money::apply_basis_points;
use crate::domain::quote::TaxLine;
use crate::domain::tax::{CalculationBasis, Tax, TaxExemption};

/// Stay figures taxes are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxContext {
    pub subtotal_cents: i64,
    /// Sum of fee lines flagged taxable.
    pub taxable_fees_cents: i64,
    pub units: i64,
    pub guests: i64,
    /// Date exemptions are checked against.
    pub on: NaiveDate,
}

fn is_exempt(tax: &Tax, exemptions: &[TaxExemption], on: NaiveDate) -> bool {
    exemptions
        .iter()
        .any(|exemption| exemption.tax_id == tax.id && exemption.is_valid_on(on))
}

fn tax_amount(tax: &Tax, context: &TaxContext) -> Result<i64, PricingError> {
    let rate = || {
        tax.rate_bp
            .map(i64::from)
            .ok_or(PricingError::MissingTaxRate(tax.id))
    };
    let amount = || tax.amount_cents.ok_or(PricingError::MissingTaxAmount(tax.id));

    let amount_cents = match tax.calculation_basis {
        CalculationBasis::SubtotalOnly => apply_basis_points(context.subtotal_cents, rate()?),
        CalculationBasis::SubtotalAndFees => {
            let rate = rate()?;
            context
                .subtotal_cents
                .checked_add(context.taxable_fees_cents)
                .and_then(|base| apply_basis_points(base, rate))
        }
        CalculationBasis::PerUnit => amount()?.checked_mul(context.units),
        CalculationBasis::PerPersonPerUnit => amount()?
            .checked_mul(context.guests)
            .and_then(|per_unit| per_unit.checked_mul(context.units)),
    };

    amount_cents.ok_or(PricingError::AmountOverflow)
}

/// Evaluate active, non-exempt taxes in configuration order.
pub fn evaluate_taxes(
    taxes: &[Tax],
    exemptions: &[TaxExemption],
    context: &TaxContext,
) -> Result<Vec<TaxLine>, PricingError> {
    taxes
        .iter()
        .filter(|tax| tax.is_active)
        .filter(|tax| !is_exempt(tax, exemptions, context.on))
        .map(|tax| {
            Ok(TaxLine {
                tax_id: tax.id,
                name: tax.name.clone(),
                calculation_basis: tax.calculation_basis,
                amount_cents: tax_amount(tax, context)?,
            })
        })
        .collect()
}
