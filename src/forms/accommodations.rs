use serde::Deserialize;
use validator::Validate;

use super::{FormError, FormResult, parse_choice, required_text};
use crate::domain::accommodation::NewAccommodation;

const NAME_MAX_LEN: u64 = 160;
const MAX_GUESTS_LIMIT: i32 = 50;

/// Payload submitted by a host creating a listing.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccommodationForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    pub accommodation_type: Option<String>,
    pub occupation_mode: Option<String>,
    #[validate(range(min = 1, max = MAX_GUESTS_LIMIT))]
    pub max_guests: i32,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub cancellation_policy: Option<String>,
    pub booking_mode: Option<String>,
}

impl CreateAccommodationForm {
    pub fn into_new_accommodation(self, hub_id: i32, host_id: i32) -> FormResult<NewAccommodation> {
        self.validate()?;

        let name = required_text("name", &self.name)?;
        let mut accommodation = NewAccommodation::new(hub_id, host_id, name, self.max_guests);

        if let Some(value) = self.accommodation_type.as_deref() {
            accommodation = accommodation.with_type(parse_choice("accommodation_type", value)?);
        }
        if let Some(value) = self.occupation_mode.as_deref() {
            accommodation =
                accommodation.with_occupation_mode(parse_choice("occupation_mode", value)?);
        }
        if let Some(value) = self.cancellation_policy.as_deref() {
            accommodation = accommodation
                .with_cancellation_policy(parse_choice("cancellation_policy", value)?);
        }
        if let Some(value) = self.booking_mode.as_deref() {
            accommodation = accommodation.with_booking_mode(parse_choice("booking_mode", value)?);
        }

        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                accommodation = accommodation.with_location(latitude, longitude);
            }
            (None, None) => {}
            _ => return Err(FormError::invalid("location", "latitude and longitude go together")),
        }

        Ok(accommodation)
    }
}
