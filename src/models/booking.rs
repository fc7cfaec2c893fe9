use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::booking::{
    Actor, Booking as DomainBooking, BookingAction, BookingStatus, BookingTransition,
    NewBooking as DomainNewBooking,
};
use crate::domain::quote::PriceBreakdown;
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct Booking {
    pub id: i32,
    pub accommodation_id: i32,
    pub guest_id: i32,
    pub status: String,
    pub payment_status: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub currency: String,
    pub subtotal_cents: i64,
    pub fees_total_cents: i64,
    pub taxes_total_cents: i64,
    pub total_price_cents: i64,
    pub price_breakdown: String,
    pub refund_amount_cents: Option<i64>,
    pub guest_notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub decline_reason: Option<String>,
    pub cancelled_by: Option<String>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub declined_at: Option<NaiveDateTime>,
    pub cancelled_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub no_show_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking<'a> {
    pub accommodation_id: i32,
    pub guest_id: i32,
    pub status: &'a str,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub currency: &'a str,
    pub subtotal_cents: i64,
    pub fees_total_cents: i64,
    pub taxes_total_cents: i64,
    pub total_price_cents: i64,
    pub price_breakdown: String,
    pub guest_notes: Option<&'a str>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Columns touched by a status transition. `None` fields are left unchanged.
#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::bookings)]
pub struct BookingStatusChange<'a> {
    pub status: &'a str,
    pub payment_status: Option<&'a str>,
    pub refund_amount_cents: Option<i64>,
    pub cancellation_reason: Option<&'a str>,
    pub decline_reason: Option<&'a str>,
    pub cancelled_by: Option<&'a str>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub declined_at: Option<NaiveDateTime>,
    pub cancelled_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub no_show_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Booking> for DomainBooking {
    type Error = RepositoryError;

    fn try_from(value: Booking) -> Result<Self, Self::Error> {
        let price_breakdown: PriceBreakdown = serde_json::from_str(&value.price_breakdown)?;

        Ok(Self {
            id: value.id,
            accommodation_id: value.accommodation_id,
            guest_id: value.guest_id,
            status: value.status.parse()?,
            payment_status: value.payment_status.parse()?,
            check_in: value.check_in,
            check_out: value.check_out,
            guests: value.guests,
            currency: value.currency,
            subtotal_cents: value.subtotal_cents,
            fees_total_cents: value.fees_total_cents,
            taxes_total_cents: value.taxes_total_cents,
            total_price_cents: value.total_price_cents,
            price_breakdown,
            refund_amount_cents: value.refund_amount_cents,
            guest_notes: value.guest_notes,
            cancellation_reason: value.cancellation_reason,
            decline_reason: value.decline_reason,
            cancelled_by: value.cancelled_by.as_deref().map(str::parse::<Actor>).transpose()?,
            confirmed_at: value.confirmed_at,
            declined_at: value.declined_at,
            cancelled_at: value.cancelled_at,
            completed_at: value.completed_at,
            no_show_at: value.no_show_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl<'a> TryFrom<&'a DomainNewBooking> for NewBooking<'a> {
    type Error = RepositoryError;

    fn try_from(value: &'a DomainNewBooking) -> Result<Self, Self::Error> {
        let breakdown = &value.price_breakdown;
        let confirmed_at = (value.status == BookingStatus::Confirmed)
            .then_some(value.created_at);

        Ok(Self {
            accommodation_id: value.accommodation_id,
            guest_id: value.guest_id,
            status: value.status.as_str(),
            check_in: value.stay.start(),
            check_out: value.stay.end(),
            guests: value.guests,
            currency: breakdown.currency.as_str(),
            subtotal_cents: breakdown.subtotal_cents,
            fees_total_cents: breakdown.fees_total_cents,
            taxes_total_cents: breakdown.taxes_total_cents,
            total_price_cents: breakdown.total_cents,
            price_breakdown: serde_json::to_string(breakdown)?,
            guest_notes: value.guest_notes.as_deref(),
            confirmed_at,
            created_at: value.created_at,
            updated_at: value.created_at,
        })
    }
}

impl<'a> From<&'a BookingTransition> for BookingStatusChange<'a> {
    fn from(value: &'a BookingTransition) -> Self {
        let at = Some(value.at);
        let reason = value.reason.as_deref();
        let mut change = Self {
            status: value.target().as_str(),
            payment_status: value.payment_status.map(|status| status.as_str()),
            refund_amount_cents: value.refund_amount_cents,
            updated_at: value.at,
            ..Self::default()
        };

        match value.action {
            BookingAction::Confirm => change.confirmed_at = at,
            BookingAction::Decline => {
                change.declined_at = at;
                change.decline_reason = reason;
            }
            BookingAction::Cancel => {
                change.cancelled_at = at;
                change.cancellation_reason = reason;
                change.cancelled_by = Some(value.actor.as_str());
            }
            BookingAction::Complete => change.completed_at = at,
            BookingAction::MarkNoShow => change.no_show_at = at,
        }

        change
    }
}
