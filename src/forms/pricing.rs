//! Listing pricing configuration: base price, pricing periods, fees, taxes
//! and tax exemptions.

use chrono::{NaiveDate, Weekday};
use serde::Deserialize;
use validator::Validate;

use super::{
    FormError, FormResult, optional_text, parse_amount, parse_choice, parse_multiplier,
    parse_percent, required_text, sanitize_currency,
};
use crate::domain::fee::{ChargeType, NewFee, PercentageBasis, ThresholdMode};
use crate::domain::owner::OwnerRef;
use crate::domain::pricing::{NewPriceableItem, NewPricingPeriod, PeriodType, PricingType, Weekdays};
use crate::domain::tax::{CalculationBasis, Jurisdiction, NewTax, NewTaxExemption};

const NAME_MAX_LEN: u64 = 128;

#[derive(Debug, Deserialize, Validate)]
pub struct SetBasePriceForm {
    pub pricing_type: Option<String>,
    /// Decimal amount in `currency`, e.g. `"100.00"`.
    pub base_price: String,
    pub currency: String,
    /// Base price in the platform reference currency. Defaults to `base_price`.
    pub reference_price: Option<String>,
    #[validate(range(min = 1))]
    pub min_quantity: Option<i32>,
    #[validate(range(min = 1))]
    pub max_quantity: Option<i32>,
}

impl SetBasePriceForm {
    pub fn into_new_priceable_item(self, owner: OwnerRef) -> FormResult<NewPriceableItem> {
        self.validate()?;

        let pricing_type = match self.pricing_type.as_deref() {
            Some(value) => parse_choice("pricing_type", value)?,
            None => PricingType::default(),
        };
        let base_price_cents = parse_amount("base_price", &self.base_price)?;
        let currency = sanitize_currency(&self.currency)?;

        let min_quantity = self.min_quantity.unwrap_or(1);
        if let Some(max) = self.max_quantity
            && max < min_quantity
        {
            return Err(FormError::invalid("max_quantity", max.to_string()));
        }

        let mut item = NewPriceableItem::new(owner, pricing_type, base_price_cents, currency)
            .with_quantity_bounds(min_quantity, self.max_quantity);

        if let Some(reference) = self.reference_price.as_deref() {
            item = item.with_reference_price(parse_amount("reference_price", reference)?);
        }

        Ok(item)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddPricingPeriodForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    pub period_type: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Weekday names such as `["fri", "sat"]`.
    #[serde(default)]
    pub weekdays: Vec<String>,
    pub price_override: Option<String>,
    /// Decimal factor, e.g. `"1.25"`.
    pub multiplier: Option<String>,
    #[serde(default)]
    pub priority: i32,
}

impl AddPricingPeriodForm {
    pub fn into_new_pricing_period(self, priceable_item_id: i32) -> FormResult<NewPricingPeriod> {
        self.validate()?;

        let name = required_text("name", &self.name)?;
        let period_type: PeriodType = parse_choice("period_type", &self.period_type)?;

        let (start_date, end_date, weekdays) = match period_type {
            PeriodType::Seasonal => {
                let start = self.start_date.ok_or(FormError::Empty { field: "start_date" })?;
                let end = self.end_date.ok_or(FormError::Empty { field: "end_date" })?;
                (Some(start), Some(end), None)
            }
            PeriodType::SpecialDate => {
                let date = self.start_date.ok_or(FormError::Empty { field: "start_date" })?;
                (Some(date), Some(date), None)
            }
            PeriodType::DayOfWeek => {
                let weekdays = parse_weekdays(&self.weekdays)?;
                (self.start_date, self.end_date, Some(weekdays))
            }
        };

        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            return Err(FormError::invalid("end_date", end.to_string()));
        }

        let price_override_cents = self
            .price_override
            .as_deref()
            .map(|value| parse_amount("price_override", value))
            .transpose()?;
        let multiplier_bp = self
            .multiplier
            .as_deref()
            .map(|value| parse_multiplier("multiplier", value))
            .transpose()?;

        if price_override_cents.is_none() && multiplier_bp.is_none() {
            return Err(FormError::Empty {
                field: "price_override",
            });
        }

        Ok(NewPricingPeriod {
            priceable_item_id,
            name,
            period_type,
            start_date,
            end_date,
            weekdays,
            price_override_cents,
            multiplier_bp,
            priority: self.priority,
        })
    }
}

fn parse_weekdays(values: &[String]) -> FormResult<Weekdays> {
    let weekdays = values
        .iter()
        .map(|value| {
            value
                .trim()
                .parse::<Weekday>()
                .map_err(|_| FormError::invalid("weekdays", value.trim()))
        })
        .collect::<FormResult<Weekdays>>()?;

    if weekdays.is_empty() {
        return Err(FormError::Empty { field: "weekdays" });
    }
    Ok(weekdays)
}

/// Optional thresholds gating a fee.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct FeeThresholds {
    #[validate(range(min = 0))]
    pub applies_after_quantity: Option<i32>,
    #[validate(range(min = 0))]
    pub applies_after_persons: Option<i32>,
    pub applies_after_amount: Option<String>,
    pub threshold_mode: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddFeeForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    pub fee_type: String,
    pub charge_type: String,
    /// Fixed amount for non-percentage charge types.
    pub amount: Option<String>,
    /// Percentage for the `percentage` charge type, e.g. `"10"`.
    pub rate_percent: Option<String>,
    pub percentage_basis: Option<String>,
    pub currency: String,
    #[serde(default = "default_true")]
    pub is_mandatory: bool,
    #[serde(default = "default_true")]
    pub is_taxable: bool,
    #[serde(default = "default_true")]
    pub is_refundable: bool,
    #[serde(flatten)]
    #[validate(nested)]
    pub thresholds: FeeThresholds,
}

fn default_true() -> bool {
    true
}

impl AddFeeForm {
    pub fn into_new_fee(self, owner: OwnerRef) -> FormResult<NewFee> {
        self.validate()?;

        let name = required_text("name", &self.name)?;
        let fee_type = parse_choice("fee_type", &self.fee_type)?;
        let charge_type: ChargeType = parse_choice("charge_type", &self.charge_type)?;
        let currency = sanitize_currency(&self.currency)?;

        let mut fee = if charge_type == ChargeType::Percentage {
            let rate = self
                .rate_percent
                .as_deref()
                .ok_or(FormError::Empty { field: "rate_percent" })?;
            let basis: PercentageBasis = match self.percentage_basis.as_deref() {
                Some(value) => parse_choice("percentage_basis", value)?,
                None => PercentageBasis::Subtotal,
            };
            let rate_bp = parse_percent("rate_percent", rate)?;
            NewFee::percentage(owner, name, fee_type, rate_bp, basis, currency)
        } else {
            let amount = self.amount.as_deref().ok_or(FormError::Empty { field: "amount" })?;
            NewFee::fixed(
                owner,
                name,
                fee_type,
                charge_type,
                parse_amount("amount", amount)?,
                currency,
            )
        };

        if !self.is_mandatory {
            fee = fee.optional();
        }
        if !self.is_taxable {
            fee = fee.non_taxable();
        }
        if !self.is_refundable {
            fee = fee.non_refundable();
        }

        let thresholds = self.thresholds;
        let amount_threshold = thresholds
            .applies_after_amount
            .as_deref()
            .map(|value| parse_amount("applies_after_amount", value))
            .transpose()?;
        let mode = match thresholds.threshold_mode.as_deref() {
            Some(value) => parse_choice("threshold_mode", value)?,
            None => ThresholdMode::default(),
        };

        Ok(fee.with_thresholds(
            thresholds.applies_after_quantity,
            thresholds.applies_after_persons,
            amount_threshold,
            mode,
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddTaxForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(equal = 2))]
    pub country: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub calculation_basis: String,
    /// Percentage for rate based taxes.
    pub rate_percent: Option<String>,
    /// Fixed amount for per-unit taxes.
    pub amount: Option<String>,
}

impl AddTaxForm {
    pub fn into_new_tax(self, owner: OwnerRef) -> FormResult<NewTax> {
        self.validate()?;

        let name = required_text("name", &self.name)?;
        let country = self.country.trim();
        if !country.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(FormError::invalid("country", country));
        }

        let jurisdiction = Jurisdiction {
            country: country.to_ascii_uppercase(),
            region: optional_text(self.region.as_deref()),
            city: optional_text(self.city.as_deref()),
        };
        let basis: CalculationBasis = parse_choice("calculation_basis", &self.calculation_basis)?;

        if basis.is_rate_based() {
            let rate = self
                .rate_percent
                .as_deref()
                .ok_or(FormError::Empty { field: "rate_percent" })?;
            Ok(NewTax::rate(owner, name, jurisdiction, basis, parse_percent("rate_percent", rate)?))
        } else {
            let amount = self.amount.as_deref().ok_or(FormError::Empty { field: "amount" })?;
            Ok(NewTax::fixed(owner, name, jurisdiction, basis, parse_amount("amount", amount)?))
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddTaxExemptionForm {
    pub tax_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub reason: String,
    pub certificate: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
}

impl AddTaxExemptionForm {
    pub fn into_new_tax_exemption(self, owner: OwnerRef) -> FormResult<NewTaxExemption> {
        self.validate()?;

        if let (Some(from), Some(until)) = (self.valid_from, self.expires_on)
            && until < from
        {
            return Err(FormError::invalid("expires_on", until.to_string()));
        }

        Ok(NewTaxExemption {
            tax_id: self.tax_id,
            owner,
            reason: required_text("reason", &self.reason)?,
            certificate: optional_text(self.certificate.as_deref()),
            valid_from: self.valid_from,
            expires_on: self.expires_on,
        })
    }
}
