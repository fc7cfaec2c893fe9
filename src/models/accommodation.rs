use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::accommodation::{
    Accommodation as DomainAccommodation, NewAccommodation as DomainNewAccommodation,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::accommodations)]
pub struct Accommodation {
    pub id: i32,
    pub hub_id: i32,
    pub host_id: i32,
    pub name: String,
    pub accommodation_type: String,
    pub occupation_mode: String,
    pub max_guests: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub is_featured: bool,
    pub cancellation_policy: String,
    pub booking_mode: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::accommodations)]
pub struct NewAccommodation<'a> {
    pub hub_id: i32,
    pub host_id: i32,
    pub name: &'a str,
    pub accommodation_type: &'a str,
    pub occupation_mode: &'a str,
    pub max_guests: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cancellation_policy: &'a str,
    pub booking_mode: &'a str,
}

impl TryFrom<Accommodation> for DomainAccommodation {
    type Error = RepositoryError;

    fn try_from(value: Accommodation) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            hub_id: value.hub_id,
            host_id: value.host_id,
            name: value.name,
            accommodation_type: value.accommodation_type.parse()?,
            occupation_mode: value.occupation_mode.parse()?,
            max_guests: value.max_guests,
            latitude: value.latitude,
            longitude: value.longitude,
            is_active: value.is_active,
            is_featured: value.is_featured,
            cancellation_policy: value.cancellation_policy.parse()?,
            booking_mode: value.booking_mode.parse()?,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewAccommodation> for NewAccommodation<'a> {
    fn from(value: &'a DomainNewAccommodation) -> Self {
        Self {
            hub_id: value.hub_id,
            host_id: value.host_id,
            name: value.name.as_str(),
            accommodation_type: value.accommodation_type.as_str(),
            occupation_mode: value.occupation_mode.as_str(),
            max_guests: value.max_guests,
            latitude: value.latitude,
            longitude: value.longitude,
            cancellation_policy: value.cancellation_policy.as_str(),
            booking_mode: value.booking_mode.as_str(),
        }
    }
}
