use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use chrono::NaiveDate;
use csv::Trim;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use validator::Validate;

use super::{FormError, FormResult, date_range, optional_text, parse_choice};
use crate::domain::availability::{
    AvailabilityReason, AvailabilityStatus, NewAvailabilityPeriod, StayRange,
};

const NOTES_MAX_LEN: u64 = 500;

/// Host request to take a date range off the calendar.
#[derive(Debug, Deserialize, Validate)]
pub struct BlockDatesForm {
    pub start_date: NaiveDate,
    /// Exclusive, like a check-out date.
    pub end_date: NaiveDate,
    pub status: Option<String>,
    pub reason: Option<String>,
    #[validate(length(max = NOTES_MAX_LEN))]
    pub notes: Option<String>,
}

impl BlockDatesForm {
    pub fn into_new_period(self, accommodation_id: i32) -> FormResult<NewAvailabilityPeriod> {
        self.validate()?;

        let range = date_range(self.start_date, self.end_date)?;
        build_block(
            accommodation_id,
            range,
            self.status.as_deref(),
            self.reason.as_deref(),
            self.notes.as_deref(),
            AvailabilityReason::OwnerBlocked,
        )
    }
}

fn build_block(
    accommodation_id: i32,
    range: StayRange,
    status: Option<&str>,
    reason: Option<&str>,
    notes: Option<&str>,
    default_reason: AvailabilityReason,
) -> FormResult<NewAvailabilityPeriod> {
    let status = match status {
        Some(value) => parse_choice("status", value)?,
        None => AvailabilityStatus::Blocked,
    };
    // Booked periods belong to bookings; available periods block nothing.
    if matches!(status, AvailabilityStatus::Booked | AvailabilityStatus::Available) {
        return Err(FormError::invalid("status", status.as_str()));
    }

    let reason = match reason {
        Some(value) => parse_choice("reason", value)?,
        None => default_reason,
    };
    if reason == AvailabilityReason::Booking {
        return Err(FormError::invalid("reason", reason.as_str()));
    }

    let mut period = NewAvailabilityPeriod::blocked(accommodation_id, range)
        .with_status(status)
        .with_reason(reason);
    if let Some(notes) = optional_text(notes) {
        period = period.with_notes(notes);
    }

    Ok(period)
}

/// Multipart form carrying a calendar export in CSV.
#[derive(MultipartForm)]
pub struct UploadAvailabilityForm {
    #[multipart(limit = "10MB")]
    /// CSV with `start_date,end_date,status,reason,notes` columns.
    pub csv: TempFile,
}

impl UploadAvailabilityForm {
    /// Parse the uploaded CSV into blocks for `accommodation_id`.
    pub fn into_new_periods(
        &mut self,
        accommodation_id: i32,
    ) -> FormResult<Vec<NewAvailabilityPeriod>> {
        self.csv.file.rewind()?;
        parse_availability(self.csv.file.by_ref(), accommodation_id)
    }
}

#[derive(Deserialize)]
struct AvailabilityCsvRow {
    start_date: String,
    end_date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    reason: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

fn parse_availability<R: Read>(
    reader: R,
    accommodation_id: i32,
) -> FormResult<Vec<NewAvailabilityPeriod>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut periods = Vec::new();

    for (index, row) in csv_reader.deserialize::<AvailabilityCsvRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let record = row?;

        let start = parse_row_date(line, "start_date", &record.start_date)?;
        let end = parse_row_date(line, "end_date", &record.end_date)?;
        let range = StayRange::new(start, end).map_err(|err| FormError::UploadRow {
            row: line,
            message: err.to_string(),
        })?;

        let period = build_block(
            accommodation_id,
            range,
            record.status.as_deref(),
            record.reason.as_deref(),
            record.notes.as_deref(),
            AvailabilityReason::ExternalSync,
        )
        .map_err(|err| FormError::UploadRow {
            row: line,
            message: err.to_string(),
        })?;

        periods.push(period);
    }

    if periods.is_empty() {
        return Err(FormError::EmptyUpload);
    }

    Ok(periods)
}

fn parse_row_date(row: usize, field: &str, value: &str) -> FormResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FormError::UploadRow {
        row,
        message: format!("invalid {field} `{value}`"),
    })
}
