use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use super::{FormResult, stay_range};
use crate::domain::availability::StayRange;
use crate::pricing::QuoteRequest;

/// Dates, party size and optional extras a guest wants priced.
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteForm {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1))]
    pub guests: i32,
    #[serde(default)]
    pub optional_fee_ids: Vec<i32>,
}

impl QuoteForm {
    pub fn into_quote_request(self) -> FormResult<QuoteRequest> {
        self.validate()?;

        let mut optional_fee_ids = self.optional_fee_ids;
        optional_fee_ids.sort_unstable();
        optional_fee_ids.dedup();

        Ok(QuoteRequest {
            stay: stay_range(self.check_in, self.check_out)?,
            guests: self.guests,
            optional_fee_ids,
        })
    }
}

/// Query string of the availability endpoint.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl AvailabilityQuery {
    pub fn into_range(self) -> FormResult<StayRange> {
        stay_range(self.check_in, self.check_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormError;

    #[test]
    fn quote_form_dedups_fee_ids() {
        let form: QuoteForm = serde_json::from_value(serde_json::json!({
            "check_in": "2025-06-01",
            "check_out": "2025-06-04",
            "guests": 2,
            "optional_fee_ids": [5, 3, 5],
        }))
        .unwrap();

        let request = form.into_quote_request().expect("valid quote");

        assert_eq!(request.stay.nights(), 3);
        assert_eq!(request.optional_fee_ids, vec![3, 5]);
    }

    #[test]
    fn quote_form_rejects_reversed_dates_and_empty_party() {
        let reversed: QuoteForm = serde_json::from_str(
            r#"{"check_in":"2025-06-04","check_out":"2025-06-01","guests":2}"#,
        )
        .unwrap();
        assert!(matches!(reversed.into_quote_request(), Err(FormError::Range(_))));

        let empty: QuoteForm = serde_json::from_str(
            r#"{"check_in":"2025-06-01","check_out":"2025-06-04","guests":0}"#,
        )
        .unwrap();
        assert!(matches!(empty.into_quote_request(), Err(FormError::Validation(_))));
    }

    #[test]
    fn stays_longer_than_a_year_are_not_quoted() {
        let form: QuoteForm = serde_json::from_str(
            r#"{"check_in":"2025-01-01","check_out":"2026-01-03","guests":2}"#,
        )
        .unwrap();
        assert!(matches!(
            form.into_quote_request(),
            Err(FormError::StayTooLong { nights: 367, .. })
        ));

        let query = AvailabilityQuery {
            check_in: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2300, 1, 1).unwrap(),
        };
        assert!(matches!(query.into_range(), Err(FormError::StayTooLong { .. })));
    }
}
