use super::PricingError;
use super::fees::{FeeContext, evaluate_fees, select_fees};
use super::rules::price_units;
use super::taxes::{TaxContext, evaluate_taxes};
use crate::domain::availability::StayRange;
use crate::domain::fee::Fee;
use crate::domain::money::checked_sum;
use crate::domain::pricing::{PriceableItem, PricingPeriod};
use crate::domain::quote::PriceBreakdown;
use crate::domain::tax::{Tax, TaxExemption};

/// What the guest asks to be priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub stay: StayRange,
    pub guests: i32,
    pub optional_fee_ids: Vec<i32>,
}

/// Pricing configuration of one owner, as loaded from storage.
#[derive(Debug, Clone, Copy)]
pub struct PricingInputs<'a> {
    pub item: Option<&'a PriceableItem>,
    pub periods: &'a [PricingPeriod],
    pub fees: &'a [Fee],
    pub taxes: &'a [Tax],
    pub exemptions: &'a [TaxExemption],
}

/// Price a stay end to end.
///
/// Exemptions are checked against the check-in date. The total is the exact
/// sum of the individually rounded lines.
pub fn build_breakdown(
    inputs: &PricingInputs<'_>,
    request: &QuoteRequest,
) -> Result<PriceBreakdown, PricingError> {
    let item = inputs.item.ok_or(PricingError::NoActivePricing)?;
    if request.guests < 1 {
        return Err(PricingError::InvalidGuestCount);
    }

    let unit_pricing = price_units(item, inputs.periods, request.stay)?;
    let units = unit_pricing.units.len() as i64;
    let guests = i64::from(request.guests);

    let selected = select_fees(inputs.fees, &request.optional_fee_ids)?;
    let fees = evaluate_fees(
        &selected,
        &FeeContext {
            currency: &item.currency,
            subtotal_cents: unit_pricing.subtotal_cents,
            units,
            guests,
        },
    )?;
    let fees_total_cents = checked_sum(fees.iter().map(|line| line.amount_cents))
        .ok_or(PricingError::AmountOverflow)?;
    let taxable_fees_cents = checked_sum(
        fees.iter()
            .filter(|line| line.is_taxable)
            .map(|line| line.amount_cents),
    )
    .ok_or(PricingError::AmountOverflow)?;

    let taxes = evaluate_taxes(
        inputs.taxes,
        inputs.exemptions,
        &TaxContext {
            subtotal_cents: unit_pricing.subtotal_cents,
            taxable_fees_cents,
            units,
            guests,
            on: request.stay.start(),
        },
    )?;
    let taxes_total_cents = checked_sum(taxes.iter().map(|line| line.amount_cents))
        .ok_or(PricingError::AmountOverflow)?;
    let total_cents = checked_sum([
        unit_pricing.subtotal_cents,
        fees_total_cents,
        taxes_total_cents,
    ])
    .ok_or(PricingError::AmountOverflow)?;

    Ok(PriceBreakdown {
        currency: item.currency.clone(),
        pricing_type: item.pricing_type,
        check_in: request.stay.start(),
        check_out: request.stay.end(),
        guests: request.guests,
        subtotal_cents: unit_pricing.subtotal_cents,
        units: unit_pricing.units,
        total_cents,
        fees,
        fees_total_cents,
        taxes,
        taxes_total_cents,
    })
}
