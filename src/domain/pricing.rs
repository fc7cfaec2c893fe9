use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use super::UnknownVariant;
use super::owner::OwnerRef;

/// Unit a base price is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    /// One unit per night, check-out day excluded.
    #[default]
    Nightly,
    /// One unit per calendar day, check-out day included.
    Daily,
}

impl PricingType {
    pub fn as_str(self) -> &'static str {
        match self {
            PricingType::Nightly => "nightly",
            PricingType::Daily => "daily",
        }
    }
}

impl FromStr for PricingType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "nightly" => Ok(PricingType::Nightly),
            "daily" => Ok(PricingType::Daily),
            other => Err(UnknownVariant::new("pricing type", other)),
        }
    }
}

/// Base price record attached to an owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceableItem {
    pub id: i32,
    pub owner: OwnerRef,
    pub pricing_type: PricingType,
    pub base_price_cents: i64,
    /// ISO 4217 code of `base_price_cents`.
    pub currency: String,
    /// Base price normalized to the platform reference currency.
    pub reference_price_cents: i64,
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to set a new base price for an owner.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPriceableItem {
    pub owner: OwnerRef,
    pub pricing_type: PricingType,
    pub base_price_cents: i64,
    pub currency: String,
    pub reference_price_cents: i64,
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
}

impl NewPriceableItem {
    /// Build a payload whose reference price equals the base price.
    pub fn new(
        owner: OwnerRef,
        pricing_type: PricingType,
        base_price_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            owner,
            pricing_type,
            base_price_cents,
            currency: currency.into(),
            reference_price_cents: base_price_cents,
            min_quantity: 1,
            max_quantity: None,
        }
    }

    pub fn with_reference_price(mut self, reference_price_cents: i64) -> Self {
        self.reference_price_cents = reference_price_cents;
        self
    }

    pub fn with_quantity_bounds(mut self, min_quantity: i32, max_quantity: Option<i32>) -> Self {
        self.min_quantity = min_quantity;
        self.max_quantity = max_quantity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// A date range such as a summer season.
    Seasonal,
    /// A single date such as a holiday.
    SpecialDate,
    /// A set of weekdays, optionally limited to a date range.
    DayOfWeek,
}

impl PeriodType {
    pub fn as_str(self) -> &'static str {
        match self {
            PeriodType::Seasonal => "seasonal",
            PeriodType::SpecialDate => "special_date",
            PeriodType::DayOfWeek => "day_of_week",
        }
    }
}

impl FromStr for PeriodType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "seasonal" => Ok(PeriodType::Seasonal),
            "special_date" => Ok(PeriodType::SpecialDate),
            "day_of_week" => Ok(PeriodType::DayOfWeek),
            other => Err(UnknownVariant::new("period type", other)),
        }
    }
}

/// Set of weekdays stored as a bit mask, Monday being bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weekdays(i32);

impl Weekdays {
    pub fn from_bits(bits: i32) -> Self {
        Self(bits & 0b111_1111)
    }

    pub fn bits(self) -> i32 {
        self.0
    }

    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | (1 << day.num_days_from_monday()))
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Weekday> for Weekdays {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Weekdays::default(), Weekdays::with)
    }
}

/// Override of the base price for matching dates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingPeriod {
    pub id: i32,
    pub priceable_item_id: i32,
    pub name: String,
    pub period_type: PeriodType,
    /// First covered date, inclusive. `None` means unbounded.
    pub start_date: Option<NaiveDate>,
    /// Last covered date, inclusive. `None` means unbounded.
    pub end_date: Option<NaiveDate>,
    pub weekdays: Option<Weekdays>,
    /// Replaces the base price. Takes precedence over `multiplier_bp`.
    pub price_override_cents: Option<i64>,
    /// Scales the base price, in basis points.
    pub multiplier_bp: Option<i32>,
    /// Higher wins when several periods cover the same date.
    pub priority: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl PricingPeriod {
    /// Whether this period applies to `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }

        if let Some(start) = self.start_date
            && date < start
        {
            return false;
        }

        if let Some(end) = self.end_date
            && date > end
        {
            return false;
        }

        match self.period_type {
            PeriodType::Seasonal => true,
            PeriodType::SpecialDate => self.start_date == Some(date),
            PeriodType::DayOfWeek => self
                .weekdays
                .is_some_and(|weekdays| weekdays.contains(date.weekday())),
        }
    }

    /// Number of days covered; `None` when either end is unbounded.
    pub fn span_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((end - start).num_days() + 1),
            (Some(_), None) if self.period_type == PeriodType::SpecialDate => Some(1),
            _ => None,
        }
    }
}

/// Payload required to insert a pricing period.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPricingPeriod {
    pub priceable_item_id: i32,
    pub name: String,
    pub period_type: PeriodType,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub weekdays: Option<Weekdays>,
    pub price_override_cents: Option<i64>,
    pub multiplier_bp: Option<i32>,
    pub priority: i32,
}
