use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::owner::OwnerRef;
use crate::domain::tax::{
    Jurisdiction, NewTax as DomainNewTax, NewTaxExemption as DomainNewTaxExemption,
    Tax as DomainTax, TaxExemption as DomainTaxExemption,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::taxes)]
pub struct Tax {
    pub id: i32,
    pub owner_type: String,
    pub owner_id: i32,
    pub name: String,
    pub country: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub calculation_basis: String,
    pub rate_bp: Option<i32>,
    pub amount_cents: Option<i64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::taxes)]
pub struct NewTax<'a> {
    pub owner_type: &'a str,
    pub owner_id: i32,
    pub name: &'a str,
    pub country: &'a str,
    pub region: Option<&'a str>,
    pub city: Option<&'a str>,
    pub calculation_basis: &'a str,
    pub rate_bp: Option<i32>,
    pub amount_cents: Option<i64>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::tax_exemptions)]
#[diesel(belongs_to(Tax, foreign_key = tax_id))]
pub struct TaxExemption {
    pub id: i32,
    pub tax_id: i32,
    pub owner_type: String,
    pub owner_id: i32,
    pub reason: String,
    pub certificate: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tax_exemptions)]
pub struct NewTaxExemption<'a> {
    pub tax_id: i32,
    pub owner_type: &'a str,
    pub owner_id: i32,
    pub reason: &'a str,
    pub certificate: Option<&'a str>,
    pub valid_from: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
}

impl TryFrom<Tax> for DomainTax {
    type Error = RepositoryError;

    fn try_from(value: Tax) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            owner: OwnerRef::new(value.owner_type.parse()?, value.owner_id),
            name: value.name,
            jurisdiction: Jurisdiction {
                country: value.country,
                region: value.region,
                city: value.city,
            },
            calculation_basis: value.calculation_basis.parse()?,
            rate_bp: value.rate_bp,
            amount_cents: value.amount_cents,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewTax> for NewTax<'a> {
    fn from(value: &'a DomainNewTax) -> Self {
        Self {
            owner_type: value.owner.kind.as_str(),
            owner_id: value.owner.id,
            name: value.name.as_str(),
            country: value.jurisdiction.country.as_str(),
            region: value.jurisdiction.region.as_deref(),
            city: value.jurisdiction.city.as_deref(),
            calculation_basis: value.calculation_basis.as_str(),
            rate_bp: value.rate_bp,
            amount_cents: value.amount_cents,
        }
    }
}

impl TryFrom<TaxExemption> for DomainTaxExemption {
    type Error = RepositoryError;

    fn try_from(value: TaxExemption) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            tax_id: value.tax_id,
            owner: OwnerRef::new(value.owner_type.parse()?, value.owner_id),
            reason: value.reason,
            certificate: value.certificate,
            valid_from: value.valid_from,
            expires_on: value.expires_on,
            created_at: value.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewTaxExemption> for NewTaxExemption<'a> {
    fn from(value: &'a DomainNewTaxExemption) -> Self {
        Self {
            tax_id: value.tax_id,
            owner_type: value.owner.kind.as_str(),
            owner_id: value.owner.id,
            reason: value.reason.as_str(),
            certificate: value.certificate.as_deref(),
            valid_from: value.valid_from,
            expires_on: value.expires_on,
        }
    }
}
