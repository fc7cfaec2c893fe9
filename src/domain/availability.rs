use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("end date {end} must be after start date {start}")]
pub struct InvalidStayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Half-open date range `[start, end)`.
///
/// The end date is the checkout day, so a stay ending on a date does not
/// collide with a stay starting on that same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl StayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidStayRange> {
        if end <= start {
            return Err(InvalidStayRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of nights in the range.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Every night of the stay, i.e. each date in `[start, end)`.
    pub fn nights_iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |date| *date < self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Blocked,
    Booked,
    Maintenance,
    Closed,
    SoldOut,
}

impl AvailabilityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Blocked => "blocked",
            AvailabilityStatus::Booked => "booked",
            AvailabilityStatus::Maintenance => "maintenance",
            AvailabilityStatus::Closed => "closed",
            AvailabilityStatus::SoldOut => "sold_out",
        }
    }

    /// Whether a period with this status prevents new stays.
    pub fn is_blocking(self) -> bool {
        !matches!(self, AvailabilityStatus::Available)
    }
}

impl FromStr for AvailabilityStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "available" => Ok(AvailabilityStatus::Available),
            "blocked" => Ok(AvailabilityStatus::Blocked),
            "booked" => Ok(AvailabilityStatus::Booked),
            "maintenance" => Ok(AvailabilityStatus::Maintenance),
            "closed" => Ok(AvailabilityStatus::Closed),
            "sold_out" => Ok(AvailabilityStatus::SoldOut),
            other => Err(UnknownVariant::new("availability status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityReason {
    OwnerBlocked,
    Maintenance,
    Booking,
    ExternalSync,
    Other,
}

impl AvailabilityReason {
    pub fn as_str(self) -> &'static str {
        match self {
            AvailabilityReason::OwnerBlocked => "owner_blocked",
            AvailabilityReason::Maintenance => "maintenance",
            AvailabilityReason::Booking => "booking",
            AvailabilityReason::ExternalSync => "external_sync",
            AvailabilityReason::Other => "other",
        }
    }
}

impl FromStr for AvailabilityReason {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "owner_blocked" => Ok(AvailabilityReason::OwnerBlocked),
            "maintenance" => Ok(AvailabilityReason::Maintenance),
            "booking" => Ok(AvailabilityReason::Booking),
            "external_sync" => Ok(AvailabilityReason::ExternalSync),
            "other" => Ok(AvailabilityReason::Other),
            other => Err(UnknownVariant::new("availability reason", other)),
        }
    }
}

/// A dated status entry on an accommodation's calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityPeriod {
    pub id: i32,
    pub accommodation_id: i32,
    pub range: StayRange,
    pub status: AvailabilityStatus,
    pub reason: AvailabilityReason,
    /// Booking holding this period when `reason` is `booking`.
    pub booking_id: Option<i32>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Payload required to insert a calendar period.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAvailabilityPeriod {
    pub accommodation_id: i32,
    pub range: StayRange,
    pub status: AvailabilityStatus,
    pub reason: AvailabilityReason,
    pub booking_id: Option<i32>,
    pub notes: Option<String>,
}

impl NewAvailabilityPeriod {
    /// A host-created block for the given range.
    pub fn blocked(accommodation_id: i32, range: StayRange) -> Self {
        Self {
            accommodation_id,
            range,
            status: AvailabilityStatus::Blocked,
            reason: AvailabilityReason::OwnerBlocked,
            booking_id: None,
            notes: None,
        }
    }

    /// The reservation written when a stay is confirmed. The booking id is
    /// filled in by the repository when it is not yet known.
    pub fn reservation(accommodation_id: i32, range: StayRange) -> Self {
        Self {
            accommodation_id,
            range,
            status: AvailabilityStatus::Booked,
            reason: AvailabilityReason::Booking,
            booking_id: None,
            notes: None,
        }
    }

    pub fn with_status(mut self, status: AvailabilityStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_reason(mut self, reason: AvailabilityReason) -> Self {
        self.reason = reason;
        self
    }

    pub fn with_booking_id(mut self, booking_id: i32) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// One calendar entry that prevents the requested stay.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AvailabilityConflict {
    pub period_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: AvailabilityStatus,
    pub reason: AvailabilityReason,
}

/// Result of checking a date range against the calendar.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AvailabilityCheck {
    pub accommodation_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub available: bool,
    pub conflicts: Vec<AvailabilityConflict>,
}

impl AvailabilityCheck {
    /// Evaluate `periods` against `range`; every blocking period that
    /// overlaps the range is reported.
    pub fn evaluate(
        accommodation_id: i32,
        range: StayRange,
        periods: &[AvailabilityPeriod],
    ) -> Self {
        let conflicts: Vec<AvailabilityConflict> = periods
            .iter()
            .filter(|period| period.accommodation_id == accommodation_id)
            .filter(|period| period.status.is_blocking() && period.range.overlaps(&range))
            .map(|period| AvailabilityConflict {
                period_id: period.id,
                start_date: period.range.start(),
                end_date: period.range.end(),
                status: period.status,
                reason: period.reason,
            })
            .collect();

        Self {
            accommodation_id,
            check_in: range.start(),
            check_out: range.end(),
            available: conflicts.is_empty(),
            conflicts,
        }
    }

    /// Human readable explanation of the first conflict, if any.
    pub fn conflict_message(&self) -> Option<String> {
        self.conflicts.first().map(|conflict| {
            format!(
                "dates {} to {} are {} ({})",
                conflict.start_date,
                conflict.end_date,
                conflict.status.as_str(),
                conflict.reason.as_str()
            )
        })
    }
}
