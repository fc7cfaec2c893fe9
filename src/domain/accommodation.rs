use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::UnknownVariant;
use super::owner::{OwnerRef, PriceableOwner};

/// Category of a bookable listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationType {
    Apartment,
    House,
    Room,
    Villa,
    Cabin,
    Other,
}

impl AccommodationType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccommodationType::Apartment => "apartment",
            AccommodationType::House => "house",
            AccommodationType::Room => "room",
            AccommodationType::Villa => "villa",
            AccommodationType::Cabin => "cabin",
            AccommodationType::Other => "other",
        }
    }
}

impl FromStr for AccommodationType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "apartment" => Ok(AccommodationType::Apartment),
            "house" => Ok(AccommodationType::House),
            "room" => Ok(AccommodationType::Room),
            "villa" => Ok(AccommodationType::Villa),
            "cabin" => Ok(AccommodationType::Cabin),
            "other" => Ok(AccommodationType::Other),
            other => Err(UnknownVariant::new("accommodation type", other)),
        }
    }
}

/// How much of the place the guest gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupationMode {
    EntirePlace,
    PrivateRoom,
    SharedRoom,
}

impl OccupationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OccupationMode::EntirePlace => "entire_place",
            OccupationMode::PrivateRoom => "private_room",
            OccupationMode::SharedRoom => "shared_room",
        }
    }
}

impl FromStr for OccupationMode {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "entire_place" => Ok(OccupationMode::EntirePlace),
            "private_room" => Ok(OccupationMode::PrivateRoom),
            "shared_room" => Ok(OccupationMode::SharedRoom),
            other => Err(UnknownVariant::new("occupation mode", other)),
        }
    }
}

/// Whether a new booking waits for the host or is confirmed immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingMode {
    Instant,
    Request,
}

impl BookingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingMode::Instant => "instant",
            BookingMode::Request => "request",
        }
    }
}

impl FromStr for BookingMode {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "instant" => Ok(BookingMode::Instant),
            "request" => Ok(BookingMode::Request),
            other => Err(UnknownVariant::new("booking mode", other)),
        }
    }
}

/// Refund rules applied when a guest cancels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    /// Full refund until the day before check-in.
    Flexible,
    /// Full refund five days ahead, half refund until the day before.
    Moderate,
    /// Full refund two weeks ahead, half refund one week ahead.
    Strict,
    NonRefundable,
}

impl CancellationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CancellationPolicy::Flexible => "flexible",
            CancellationPolicy::Moderate => "moderate",
            CancellationPolicy::Strict => "strict",
            CancellationPolicy::NonRefundable => "non_refundable",
        }
    }

    /// Share of the refundable amount returned to the guest, in basis points,
    /// when cancelling `days_before_check_in` days ahead of arrival.
    pub fn refund_basis_points(self, days_before_check_in: i64) -> i64 {
        match self {
            CancellationPolicy::Flexible if days_before_check_in >= 1 => 10_000,
            CancellationPolicy::Moderate if days_before_check_in >= 5 => 10_000,
            CancellationPolicy::Moderate if days_before_check_in >= 1 => 5_000,
            CancellationPolicy::Strict if days_before_check_in >= 14 => 10_000,
            CancellationPolicy::Strict if days_before_check_in >= 7 => 5_000,
            _ => 0,
        }
    }
}

impl FromStr for CancellationPolicy {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "flexible" => Ok(CancellationPolicy::Flexible),
            "moderate" => Ok(CancellationPolicy::Moderate),
            "strict" => Ok(CancellationPolicy::Strict),
            "non_refundable" => Ok(CancellationPolicy::NonRefundable),
            other => Err(UnknownVariant::new("cancellation policy", other)),
        }
    }
}

/// A bookable unit owned by a host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Accommodation {
    pub id: i32,
    /// Hub the listing belongs to; hub admins manage it.
    pub hub_id: i32,
    /// User id of the owning host.
    pub host_id: i32,
    pub name: String,
    pub accommodation_type: AccommodationType,
    pub occupation_mode: OccupationMode,
    pub max_guests: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub is_featured: bool,
    pub cancellation_policy: CancellationPolicy,
    pub booking_mode: BookingMode,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Accommodation {
    pub fn is_hosted_by(&self, user_id: i32) -> bool {
        self.host_id == user_id
    }
}

impl PriceableOwner for Accommodation {
    fn owner_ref(&self) -> OwnerRef {
        OwnerRef::accommodation(self.id)
    }
}

/// Payload required to insert a new accommodation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccommodation {
    pub hub_id: i32,
    pub host_id: i32,
    pub name: String,
    pub accommodation_type: AccommodationType,
    pub occupation_mode: OccupationMode,
    pub max_guests: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cancellation_policy: CancellationPolicy,
    pub booking_mode: BookingMode,
}

impl NewAccommodation {
    /// Build a request-to-book listing with a flexible policy.
    pub fn new(hub_id: i32, host_id: i32, name: impl Into<String>, max_guests: i32) -> Self {
        Self {
            hub_id,
            host_id,
            name: name.into(),
            accommodation_type: AccommodationType::Apartment,
            occupation_mode: OccupationMode::EntirePlace,
            max_guests,
            latitude: None,
            longitude: None,
            cancellation_policy: CancellationPolicy::Flexible,
            booking_mode: BookingMode::Request,
        }
    }

    pub fn with_type(mut self, accommodation_type: AccommodationType) -> Self {
        self.accommodation_type = accommodation_type;
        self
    }

    pub fn with_occupation_mode(mut self, occupation_mode: OccupationMode) -> Self {
        self.occupation_mode = occupation_mode;
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_cancellation_policy(mut self, policy: CancellationPolicy) -> Self {
        self.cancellation_policy = policy;
        self
    }

    pub fn with_booking_mode(mut self, booking_mode: BookingMode) -> Self {
        self.booking_mode = booking_mode;
        self
    }
}
