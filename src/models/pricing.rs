use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::owner::OwnerRef;
use crate::domain::pricing::{
    NewPriceableItem as DomainNewPriceableItem, NewPricingPeriod as DomainNewPricingPeriod,
    PriceableItem as DomainPriceableItem, PricingPeriod as DomainPricingPeriod, Weekdays,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::priceable_items)]
pub struct PriceableItem {
    pub id: i32,
    pub owner_type: String,
    pub owner_id: i32,
    pub pricing_type: String,
    pub base_price_cents: i64,
    pub currency: String,
    pub reference_price_cents: i64,
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::priceable_items)]
pub struct NewPriceableItem<'a> {
    pub owner_type: &'a str,
    pub owner_id: i32,
    pub pricing_type: &'a str,
    pub base_price_cents: i64,
    pub currency: &'a str,
    pub reference_price_cents: i64,
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::pricing_periods)]
#[diesel(belongs_to(PriceableItem, foreign_key = priceable_item_id))]
pub struct PricingPeriod {
    pub id: i32,
    pub priceable_item_id: i32,
    pub name: String,
    pub period_type: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub weekdays: Option<i32>,
    pub price_override_cents: Option<i64>,
    pub multiplier_bp: Option<i32>,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::pricing_periods)]
pub struct NewPricingPeriod<'a> {
    pub priceable_item_id: i32,
    pub name: &'a str,
    pub period_type: &'a str,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub weekdays: Option<i32>,
    pub price_override_cents: Option<i64>,
    pub multiplier_bp: Option<i32>,
    pub priority: i32,
}

impl TryFrom<PriceableItem> for DomainPriceableItem {
    type Error = RepositoryError;

    fn try_from(value: PriceableItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            owner: OwnerRef::new(value.owner_type.parse()?, value.owner_id),
            pricing_type: value.pricing_type.parse()?,
            base_price_cents: value.base_price_cents,
            currency: value.currency,
            reference_price_cents: value.reference_price_cents,
            min_quantity: value.min_quantity,
            max_quantity: value.max_quantity,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewPriceableItem> for NewPriceableItem<'a> {
    fn from(value: &'a DomainNewPriceableItem) -> Self {
        Self {
            owner_type: value.owner.kind.as_str(),
            owner_id: value.owner.id,
            pricing_type: value.pricing_type.as_str(),
            base_price_cents: value.base_price_cents,
            currency: value.currency.as_str(),
            reference_price_cents: value.reference_price_cents,
            min_quantity: value.min_quantity,
            max_quantity: value.max_quantity,
        }
    }
}

impl TryFrom<PricingPeriod> for DomainPricingPeriod {
    type Error = RepositoryError;

    fn try_from(value: PricingPeriod) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            priceable_item_id: value.priceable_item_id,
            name: value.name,
            period_type: value.period_type.parse()?,
            start_date: value.start_date,
            end_date: value.end_date,
            weekdays: value.weekdays.map(Weekdays::from_bits),
            price_override_cents: value.price_override_cents,
            multiplier_bp: value.multiplier_bp,
            priority: value.priority,
            is_active: value.is_active,
            created_at: value.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewPricingPeriod> for NewPricingPeriod<'a> {
    fn from(value: &'a DomainNewPricingPeriod) -> Self {
        Self {
            priceable_item_id: value.priceable_item_id,
            name: value.name.as_str(),
            period_type: value.period_type.as_str(),
            start_date: value.start_date,
            end_date: value.end_date,
            weekdays: value.weekdays.map(Weekdays::bits),
            price_override_cents: value.price_override_cents,
            multiplier_bp: value.multiplier_bp,
            priority: value.priority,
        }
    }
}
