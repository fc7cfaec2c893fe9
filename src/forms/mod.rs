//! Incoming payloads and their conversion into domain values.

use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::UnknownVariant;
use crate::domain::availability::{InvalidStayRange, StayRange};
use crate::domain::money::parse_fixed_point;

pub mod accommodations;
pub mod availability;
pub mod bookings;
pub mod pricing;
pub mod quotes;

/// ISO 4217 currency codes are three ASCII alphabetic characters.
pub(crate) const CURRENCY_CODE_LEN: usize = 3;
/// Largest amount accepted in minor units, 100 million in the major unit.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000;
/// Longest stay that can be quoted or booked.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Result type returned by the form helpers.
pub type FormResult<T> = Result<T, FormError>;

/// Errors that can occur while processing submitted payloads.
#[derive(Debug, Error)]
pub enum FormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("invalid {field} `{value}`")]
    Invalid { field: &'static str, value: String },
    #[error(transparent)]
    Range(#[from] InvalidStayRange),
    #[error("stays are limited to {max} nights, got {nights}")]
    StayTooLong { nights: i64, max: i64 },
    /// A CSV row could not be turned into a record.
    #[error("row {row}: {message}")]
    UploadRow { row: usize, message: String },
    #[error("upload contains no rows")]
    EmptyUpload,
    #[error("error reading uploaded file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl FormError {
    pub(crate) fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        FormError::Invalid {
            field,
            value: value.into(),
        }
    }
}

/// Collapse runs of whitespace and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitize each line and squeeze blank lines, keeping paragraph breaks.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut result: Vec<String> = Vec::new();

    for line in input.lines().map(sanitize_inline_text) {
        let previous_empty = matches!(result.last(), Some(last) if last.is_empty());
        if line.is_empty() && (result.is_empty() || previous_empty) {
            continue;
        }
        result.push(line);
    }

    while matches!(result.last(), Some(line) if line.is_empty()) {
        result.pop();
    }

    result.join("\n")
}

/// Optional free text, `None` once sanitized to nothing.
pub(crate) fn optional_text(input: Option<&str>) -> Option<String> {
    input
        .map(sanitize_multiline_text)
        .filter(|value| !value.is_empty())
}

/// Required single-line text.
pub(crate) fn required_text(field: &'static str, input: &str) -> FormResult<String> {
    let sanitized = sanitize_inline_text(input);
    if sanitized.is_empty() {
        return Err(FormError::Empty { field });
    }
    Ok(sanitized)
}

pub(crate) fn sanitize_currency(input: &str) -> FormResult<String> {
    let trimmed = input.trim();
    if trimmed.len() != CURRENCY_CODE_LEN || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(FormError::invalid("currency", trimmed));
    }

    Ok(trimmed.to_ascii_uppercase())
}

/// Parse a storage name such as `per_person` into its enum.
pub(crate) fn parse_choice<T>(field: &'static str, input: &str) -> FormResult<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    let normalized = input.trim().to_ascii_lowercase();
    normalized
        .parse()
        .map_err(|_| FormError::invalid(field, input.trim()))
}

/// Parse a decimal amount such as `"149.90"` into minor units, up to
/// `MAX_AMOUNT_CENTS`.
pub(crate) fn parse_amount(field: &'static str, input: &str) -> FormResult<i64> {
    parse_fixed_point(input, 2)
        .filter(|cents| *cents <= MAX_AMOUNT_CENTS)
        .ok_or_else(|| FormError::invalid(field, input.trim()))
}

/// Parse a percentage such as `"7.5"` into basis points.
pub(crate) fn parse_percent(field: &'static str, input: &str) -> FormResult<i32> {
    parse_fixed_point(input, 2)
        .and_then(|value| i32::try_from(value).ok())
        .ok_or_else(|| FormError::invalid(field, input.trim()))
}

/// Parse a multiplier such as `"1.25"` into basis points.
pub(crate) fn parse_multiplier(field: &'static str, input: &str) -> FormResult<i32> {
    parse_fixed_point(input, 4)
        .and_then(|value| i32::try_from(value).ok())
        .ok_or_else(|| FormError::invalid(field, input.trim()))
}

/// Stay to quote or book, at most `MAX_STAY_NIGHTS` long.
pub(crate) fn stay_range(check_in: NaiveDate, check_out: NaiveDate) -> FormResult<StayRange> {
    let stay = StayRange::new(check_in, check_out)?;
    if stay.nights() > MAX_STAY_NIGHTS {
        return Err(FormError::StayTooLong {
            nights: stay.nights(),
            max: MAX_STAY_NIGHTS,
        });
    }
    Ok(stay)
}

/// Calendar range of any length, for host blocks.
pub(crate) fn date_range(start: NaiveDate, end: NaiveDate) -> FormResult<StayRange> {
    Ok(StayRange::new(start, end)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fee::ChargeType;

    #[test]
    fn inline_text_collapses_whitespace_and_drops_controls() {
        assert_eq!(sanitize_inline_text("  Sea\t\tView \u{7}Loft "), "Sea View Loft");
    }

    #[test]
    fn multiline_text_squeezes_blank_lines() {
        let text = "\n\nArriving late\n\n\n  around 23:00 \n\n";
        assert_eq!(sanitize_multiline_text(text), "Arriving late\n\naround 23:00");
        assert_eq!(optional_text(Some("  \n ")), None);
    }

    #[test]
    fn currency_is_uppercased_and_checked() {
        assert_eq!(sanitize_currency(" eur ").unwrap(), "EUR");
        assert!(matches!(
            sanitize_currency("EU1"),
            Err(FormError::Invalid { field: "currency", .. })
        ));
        assert!(sanitize_currency("EURO").is_err());
    }

    #[test]
    fn numeric_fields_parse_to_integer_units() {
        assert_eq!(parse_amount("amount", "149.9").unwrap(), 14_990);
        assert_eq!(parse_percent("rate", "7.5").unwrap(), 750);
        assert_eq!(parse_multiplier("multiplier", "1.25").unwrap(), 12_500);
        assert!(parse_amount("amount", "12.345").is_err());
        assert!(parse_percent("rate", "ten").is_err());
    }

    #[test]
    fn amounts_are_capped() {
        assert_eq!(parse_amount("amount", "100000000").unwrap(), MAX_AMOUNT_CENTS);
        assert!(matches!(
            parse_amount("amount", "100000000.01"),
            Err(FormError::Invalid { field: "amount", .. })
        ));
        assert!(parse_amount("amount", "92233720368547758.07").is_err());
    }

    #[test]
    fn stays_are_capped_but_blocks_are_not() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let longest = start + chrono::Days::new(365);
        let too_long = longest + chrono::Days::new(1);

        assert_eq!(stay_range(start, longest).unwrap().nights(), MAX_STAY_NIGHTS);
        assert!(matches!(
            stay_range(start, too_long),
            Err(FormError::StayTooLong { nights: 366, max: 365 })
        ));
        assert!(date_range(start, too_long).is_ok());
    }

    #[test]
    fn choices_are_case_insensitive() {
        let charge: ChargeType = parse_choice("charge_type", " Per_Person ").unwrap();
        assert_eq!(charge, ChargeType::PerPerson);
        assert!(parse_choice::<ChargeType>("charge_type", "hourly").is_err());
    }
}
