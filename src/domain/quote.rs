use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fee::{ChargeType, FeeType};
use super::money::checked_sum;
use super::pricing::PricingType;
use super::tax::CalculationBasis;

/// Price of a single night or day of a stay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitPrice {
    pub date: NaiveDate,
    pub price_cents: i64,
    /// Pricing period that set this price, if any.
    pub period_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeeLine {
    pub fee_id: i32,
    pub name: String,
    pub fee_type: FeeType,
    pub charge_type: ChargeType,
    pub amount_cents: i64,
    pub is_taxable: bool,
    pub is_refundable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxLine {
    pub tax_id: i32,
    pub name: String,
    pub calculation_basis: CalculationBasis,
    pub amount_cents: i64,
}

/// Full priced quote for a stay. Stored verbatim on bookings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub currency: String,
    pub pricing_type: PricingType,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub units: Vec<UnitPrice>,
    pub subtotal_cents: i64,
    pub fees: Vec<FeeLine>,
    pub fees_total_cents: i64,
    pub taxes: Vec<TaxLine>,
    pub taxes_total_cents: i64,
    pub total_cents: i64,
}

impl PriceBreakdown {
    /// Part of the total that may be returned on cancellation, `None` when
    /// the stored figures do not add up within `i64`.
    pub fn refundable_cents(&self) -> Option<i64> {
        let non_refundable = checked_sum(
            self.fees
                .iter()
                .filter(|line| !line.is_refundable)
                .map(|line| line.amount_cents),
        )?;
        self.total_cents.checked_sub(non_refundable)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}
