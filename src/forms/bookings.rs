use chrono::NaiveDate;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use validator::Validate;

use super::{FormResult, optional_text, parse_choice};
use crate::domain::booking::BookingStatus;
use crate::pricing::QuoteRequest;

const NOTES_MAX_LEN: u64 = 2000;
const REASON_MAX_LEN: u64 = 1000;
/// Deepest page the bookings index serves.
pub const MAX_PAGE: usize = 10_000;
/// Upper bound for a client supplied page size.
pub const MAX_ITEMS_PER_PAGE: usize = 100;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingForm {
    pub accommodation_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1))]
    pub guests: i32,
    #[serde(default)]
    pub optional_fee_ids: Vec<i32>,
    #[validate(length(max = NOTES_MAX_LEN))]
    pub guest_notes: Option<String>,
}

/// Validated booking request.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub accommodation_id: i32,
    pub quote: QuoteRequest,
    pub guest_notes: Option<String>,
}

impl CreateBookingForm {
    pub fn into_booking_request(self) -> FormResult<BookingRequest> {
        self.validate()?;

        let mut optional_fee_ids = self.optional_fee_ids;
        optional_fee_ids.sort_unstable();
        optional_fee_ids.dedup();

        Ok(BookingRequest {
            accommodation_id: self.accommodation_id,
            quote: QuoteRequest {
                stay: super::stay_range(self.check_in, self.check_out)?,
                guests: self.guests,
                optional_fee_ids,
            },
            guest_notes: optional_text(self.guest_notes.as_deref()),
        })
    }
}

/// Body of decline and cancel requests.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TransitionForm {
    #[validate(length(max = REASON_MAX_LEN))]
    pub reason: Option<String>,
}

impl TransitionForm {
    pub fn into_reason(self) -> FormResult<Option<String>> {
        self.validate()?;
        Ok(optional_text(self.reason.as_deref()))
    }
}

/// Which side of the bookings the caller wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingRole {
    #[default]
    Guest,
    Host,
}

/// Query string of the bookings index.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BookingsQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<String>,
    pub accommodation_id: Option<i32>,
    #[validate(range(min = 1, max = MAX_PAGE))]
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Parsed bookings index filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingsFilter {
    pub role: BookingRole,
    pub status: Option<BookingStatus>,
    pub accommodation_id: Option<i32>,
    pub page: usize,
    pub per_page: Option<usize>,
}

impl BookingsQuery {
    pub fn into_filter(self) -> FormResult<BookingsFilter> {
        self.validate()?;

        let role = match self.role.as_deref().map(str::trim) {
            None | Some("guest") => BookingRole::Guest,
            Some("host") => BookingRole::Host,
            Some(other) => return Err(super::FormError::invalid("role", other)),
        };
        let status = self
            .status
            .as_deref()
            .map(|value| parse_choice("status", value))
            .transpose()?;

        Ok(BookingsFilter {
            role,
            status,
            accommodation_id: self.accommodation_id,
            page: self.page.unwrap_or(1),
            per_page: self.per_page,
        })
    }
}
