use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::availability::{
    AvailabilityPeriod as DomainAvailabilityPeriod,
    NewAvailabilityPeriod as DomainNewAvailabilityPeriod, StayRange,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::availability_periods)]
pub struct AvailabilityPeriod {
    pub id: i32,
    pub accommodation_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub reason: String,
    pub booking_id: Option<i32>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::availability_periods)]
pub struct NewAvailabilityPeriod<'a> {
    pub accommodation_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: &'a str,
    pub reason: &'a str,
    pub booking_id: Option<i32>,
    pub notes: Option<&'a str>,
}

impl TryFrom<AvailabilityPeriod> for DomainAvailabilityPeriod {
    type Error = RepositoryError;

    fn try_from(value: AvailabilityPeriod) -> Result<Self, Self::Error> {
        let range = StayRange::new(value.start_date, value.end_date)
            .map_err(|err| RepositoryError::InvalidData(err.to_string()))?;

        Ok(Self {
            id: value.id,
            accommodation_id: value.accommodation_id,
            range,
            status: value.status.parse()?,
            reason: value.reason.parse()?,
            booking_id: value.booking_id,
            notes: value.notes,
            created_at: value.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewAvailabilityPeriod> for NewAvailabilityPeriod<'a> {
    fn from(value: &'a DomainNewAvailabilityPeriod) -> Self {
        Self {
            accommodation_id: value.accommodation_id,
            start_date: value.range.start(),
            end_date: value.range.end(),
            status: value.status.as_str(),
            reason: value.reason.as_str(),
            booking_id: value.booking_id,
            notes: value.notes.as_deref(),
        }
    }
}
