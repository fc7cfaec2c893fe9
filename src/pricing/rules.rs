//! Per-unit price resolution against the base price and pricing periods.

use std::cmp::Reverse;

use chrono::NaiveDate;

use super::PricingError;
use crate::domain::availability::StayRange;
use crate::domain::money::{apply_basis_points, checked_sum};
use crate::domain::pricing::{PriceableItem, PricingPeriod, PricingType};
use crate::domain::quote::UnitPrice;

/// Unit prices of a stay and their sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPricing {
    pub units: Vec<UnitPrice>,
    pub subtotal_cents: i64,
}

/// Dates charged for a stay: nights exclude the checkout day, days include it.
pub fn unit_dates(pricing_type: PricingType, stay: StayRange) -> Vec<NaiveDate> {
    match pricing_type {
        PricingType::Nightly => stay.nights_iter().collect(),
        PricingType::Daily => stay
            .start()
            .iter_days()
            .take_while(|date| *date <= stay.end())
            .collect(),
    }
}

/// Period deciding the price of `date`, if any covers it.
///
/// Highest priority wins, then the narrowest span (unbounded spans count as
/// widest), then the newest, then the highest id.
pub fn winning_period<'a>(
    periods: &'a [PricingPeriod],
    date: NaiveDate,
) -> Option<&'a PricingPeriod> {
    periods
        .iter()
        .filter(|period| period.covers(date))
        .max_by_key(|period| {
            (
                period.priority,
                Reverse(period.span_days().unwrap_or(i64::MAX)),
                period.created_at,
                period.id,
            )
        })
}

fn period_price(base_price_cents: i64, period: &PricingPeriod) -> Result<i64, PricingError> {
    match (period.price_override_cents, period.multiplier_bp) {
        (Some(price), _) => Ok(price),
        (None, Some(multiplier)) => apply_basis_points(base_price_cents, i64::from(multiplier))
            .ok_or(PricingError::AmountOverflow),
        (None, None) => Err(PricingError::InvalidPeriod(period.id)),
    }
}

/// Price every unit of `stay` using `item` and the periods attached to it.
pub fn price_units(
    item: &PriceableItem,
    periods: &[PricingPeriod],
    stay: StayRange,
) -> Result<UnitPricing, PricingError> {
    let dates = unit_dates(item.pricing_type, stay);
    let count = dates.len() as i64;

    if count < i64::from(item.min_quantity) {
        return Err(PricingError::BelowMinimumQuantity {
            units: count,
            min: item.min_quantity,
        });
    }
    if let Some(max) = item.max_quantity
        && count > i64::from(max)
    {
        return Err(PricingError::AboveMaximumQuantity { units: count, max });
    }

    let relevant: Vec<PricingPeriod> = periods
        .iter()
        .filter(|period| period.priceable_item_id == item.id)
        .cloned()
        .collect();

    let mut units = Vec::with_capacity(dates.len());
    for date in dates {
        let unit = match winning_period(&relevant, date) {
            Some(period) => UnitPrice {
                date,
                price_cents: period_price(item.base_price_cents, period)?,
                period_id: Some(period.id),
            },
            None => UnitPrice {
                date,
                price_cents: item.base_price_cents,
                period_id: None,
            },
        };
        units.push(unit);
    }

    let subtotal_cents = checked_sum(units.iter().map(|unit| unit.price_cents))
        .ok_or(PricingError::AmountOverflow)?;

    Ok(UnitPricing {
        units,
        subtotal_cents,
    })
}
