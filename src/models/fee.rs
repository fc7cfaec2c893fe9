use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::fee::{Fee as DomainFee, NewFee as DomainNewFee, PercentageBasis};
use crate::domain::owner::OwnerRef;
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::fees)]
pub struct Fee {
    pub id: i32,
    pub owner_type: String,
    pub owner_id: i32,
    pub name: String,
    pub fee_type: String,
    pub charge_type: String,
    pub amount_cents: Option<i64>,
    pub rate_bp: Option<i32>,
    pub percentage_basis: Option<String>,
    pub currency: String,
    pub is_mandatory: bool,
    pub is_taxable: bool,
    pub is_refundable: bool,
    pub applies_after_quantity: Option<i32>,
    pub applies_after_persons: Option<i32>,
    pub applies_after_amount_cents: Option<i64>,
    pub threshold_mode: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::fees)]
pub struct NewFee<'a> {
    pub owner_type: &'a str,
    pub owner_id: i32,
    pub name: &'a str,
    pub fee_type: &'a str,
    pub charge_type: &'a str,
    pub amount_cents: Option<i64>,
    pub rate_bp: Option<i32>,
    pub percentage_basis: Option<&'a str>,
    pub currency: &'a str,
    pub is_mandatory: bool,
    pub is_taxable: bool,
    pub is_refundable: bool,
    pub applies_after_quantity: Option<i32>,
    pub applies_after_persons: Option<i32>,
    pub applies_after_amount_cents: Option<i64>,
    pub threshold_mode: &'a str,
}

impl TryFrom<Fee> for DomainFee {
    type Error = RepositoryError;

    fn try_from(value: Fee) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            owner: OwnerRef::new(value.owner_type.parse()?, value.owner_id),
            name: value.name,
            fee_type: value.fee_type.parse()?,
            charge_type: value.charge_type.parse()?,
            amount_cents: value.amount_cents,
            rate_bp: value.rate_bp,
            percentage_basis: value
                .percentage_basis
                .as_deref()
                .map(str::parse::<PercentageBasis>)
                .transpose()?,
            currency: value.currency,
            is_mandatory: value.is_mandatory,
            is_taxable: value.is_taxable,
            is_refundable: value.is_refundable,
            applies_after_quantity: value.applies_after_quantity,
            applies_after_persons: value.applies_after_persons,
            applies_after_amount_cents: value.applies_after_amount_cents,
            threshold_mode: value.threshold_mode.parse()?,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewFee> for NewFee<'a> {
    fn from(value: &'a DomainNewFee) -> Self {
        Self {
            owner_type: value.owner.kind.as_str(),
            owner_id: value.owner.id,
            name: value.name.as_str(),
            fee_type: value.fee_type.as_str(),
            charge_type: value.charge_type.as_str(),
            amount_cents: value.amount_cents,
            rate_bp: value.rate_bp,
            percentage_basis: value.percentage_basis.map(|basis| basis.as_str()),
            currency: value.currency.as_str(),
            is_mandatory: value.is_mandatory,
            is_taxable: value.is_taxable,
            is_refundable: value.is_refundable,
            applies_after_quantity: value.applies_after_quantity,
            applies_after_persons: value.applies_after_persons,
            applies_after_amount_cents: value.applies_after_amount_cents,
            threshold_mode: value.threshold_mode.as_str(),
        }
    }
}
