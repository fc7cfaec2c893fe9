//! Repository double and fixtures shared by the service tests.

use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::accommodation::{
    Accommodation, AccommodationType, BookingMode, CancellationPolicy, NewAccommodation,
    OccupationMode,
};
use crate::domain::availability::{AvailabilityPeriod, NewAvailabilityPeriod, StayRange};
use crate::domain::booking::{
    Booking, BookingListQuery, BookingStatus, BookingTransition, NewBooking, PaymentStatus,
};
use crate::domain::fee::{Fee, NewFee};
use crate::domain::owner::{OwnerRef, PriceableOwner};
use crate::domain::pricing::{
    NewPriceableItem, NewPricingPeriod, PriceableItem, PricingPeriod, PricingType,
};
use crate::domain::quote::{FeeLine, PriceBreakdown};
use crate::domain::tax::{NewTax, NewTaxExemption, Tax, TaxExemption};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::mock::{
    MockAccommodationReader, MockAccommodationWriter, MockAvailabilityReader,
    MockAvailabilityWriter, MockBookingReader, MockBookingWriter, MockFeeReader, MockFeeWriter,
    MockPricingReader, MockPricingWriter, MockTaxReader, MockTaxWriter, MockUserReader,
    MockUserWriter,
};
use crate::repository::{
    AccommodationReader, AccommodationWriter, AvailabilityReader, AvailabilityWriter,
    BookingReader, BookingWriter, FeeReader, FeeWriter, PricingReader, PricingWriter, TaxReader,
    TaxWriter, UserReader, UserWriter,
};

pub const HUB_ID: i32 = 7;
pub const HOST_ID: i32 = 10;
pub const GUEST_ID: i32 = 20;
pub const ACCOMMODATION_ID: i32 = 1;

pub fn datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Session of the user whose mirrored id is `id`.
pub fn user(id: i32, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: format!("user-{id}"),
        email: format!("user{id}@example.com"),
        hub_id: HUB_ID,
        name: format!("User {id}"),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        exp: 0,
    }
}

/// Mirrored id encoded in the fixture email address.
fn id_from_email(email: &str) -> Option<i32> {
    email.strip_prefix("user")?.split('@').next()?.parse().ok()
}

pub fn host() -> AuthenticatedUser {
    user(HOST_ID, &[])
}

pub fn guest() -> AuthenticatedUser {
    user(GUEST_ID, &[])
}

pub fn stored_user(id: i32) -> User {
    User {
        id,
        hub_id: HUB_ID,
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
    }
}

pub fn accommodation(booking_mode: BookingMode, policy: CancellationPolicy) -> Accommodation {
    Accommodation {
        id: ACCOMMODATION_ID,
        hub_id: HUB_ID,
        host_id: HOST_ID,
        name: "Harbour Loft".to_string(),
        accommodation_type: AccommodationType::Apartment,
        occupation_mode: OccupationMode::EntirePlace,
        max_guests: 4,
        latitude: None,
        longitude: None,
        is_active: true,
        is_featured: false,
        cancellation_policy: policy,
        booking_mode,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

pub fn priceable_item(base_price_cents: i64) -> PriceableItem {
    PriceableItem {
        id: 5,
        owner: accommodation(BookingMode::Request, CancellationPolicy::Flexible).owner_ref(),
        pricing_type: PricingType::Nightly,
        base_price_cents,
        currency: "EUR".to_string(),
        reference_price_cents: base_price_cents,
        min_quantity: 1,
        max_quantity: None,
        is_active: true,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

/// Breakdown of `nights` at 100 EUR plus an optional non-refundable fee.
pub fn breakdown(range: StayRange, non_refundable_fee_cents: i64) -> PriceBreakdown {
    let subtotal_cents = range.nights() * 10_000;
    let fees: Vec<FeeLine> = if non_refundable_fee_cents > 0 {
        vec![FeeLine {
            fee_id: 3,
            name: "Cleaning".to_string(),
            fee_type: crate::domain::fee::FeeType::Cleaning,
            charge_type: crate::domain::fee::ChargeType::PerBooking,
            amount_cents: non_refundable_fee_cents,
            is_taxable: false,
            is_refundable: false,
        }]
    } else {
        Vec::new()
    };

    PriceBreakdown {
        currency: "EUR".to_string(),
        pricing_type: PricingType::Nightly,
        check_in: range.start(),
        check_out: range.end(),
        guests: 2,
        units: Vec::new(),
        subtotal_cents,
        fees,
        fees_total_cents: non_refundable_fee_cents,
        taxes: Vec::new(),
        taxes_total_cents: 0,
        total_cents: subtotal_cents + non_refundable_fee_cents,
    }
}

pub fn booking(id: i32, status: BookingStatus, range: StayRange) -> Booking {
    let price_breakdown = breakdown(range, 0);
    Booking {
        id,
        accommodation_id: ACCOMMODATION_ID,
        guest_id: GUEST_ID,
        status,
        payment_status: PaymentStatus::Unpaid,
        check_in: range.start(),
        check_out: range.end(),
        guests: 2,
        currency: "EUR".to_string(),
        subtotal_cents: price_breakdown.subtotal_cents,
        fees_total_cents: price_breakdown.fees_total_cents,
        taxes_total_cents: 0,
        total_price_cents: price_breakdown.total_cents,
        price_breakdown,
        refund_amount_cents: None,
        guest_notes: None,
        cancellation_reason: None,
        decline_reason: None,
        cancelled_by: None,
        confirmed_at: None,
        declined_at: None,
        cancelled_at: None,
        completed_at: None,
        no_show_at: None,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

/// Repository double delegating every trait to its own mockall mock.
pub struct FakeRepo {
    pub user_reader: MockUserReader,
    pub user_writer: MockUserWriter,
    pub accommodation_reader: MockAccommodationReader,
    pub accommodation_writer: MockAccommodationWriter,
    pub pricing_reader: MockPricingReader,
    pub pricing_writer: MockPricingWriter,
    pub fee_reader: MockFeeReader,
    pub fee_writer: MockFeeWriter,
    pub tax_reader: MockTaxReader,
    pub tax_writer: MockTaxWriter,
    pub availability_reader: MockAvailabilityReader,
    pub availability_writer: MockAvailabilityWriter,
    pub booking_reader: MockBookingReader,
    pub booking_writer: MockBookingWriter,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self {
            user_reader: MockUserReader::new(),
            user_writer: MockUserWriter::new(),
            accommodation_reader: MockAccommodationReader::new(),
            accommodation_writer: MockAccommodationWriter::new(),
            pricing_reader: MockPricingReader::new(),
            pricing_writer: MockPricingWriter::new(),
            fee_reader: MockFeeReader::new(),
            fee_writer: MockFeeWriter::new(),
            tax_reader: MockTaxReader::new(),
            tax_writer: MockTaxWriter::new(),
            availability_reader: MockAvailabilityReader::new(),
            availability_writer: MockAvailabilityWriter::new(),
            booking_reader: MockBookingReader::new(),
            booking_writer: MockBookingWriter::new(),
        }
    }

    /// Serve `accommodation` for any lookup.
    pub fn with_accommodation(mut self, accommodation: Accommodation) -> Self {
        self.accommodation_reader
            .expect_get_accommodation_by_id()
            .returning(move |_| Ok(Some(accommodation.clone())));
        self
    }

    /// Resolve every fixture user, by id or by session email.
    pub fn with_users(mut self) -> Self {
        self.user_reader
            .expect_get_user_by_id()
            .returning(|id| Ok(Some(stored_user(id))));
        self.user_reader
            .expect_get_user_by_email()
            .returning(|email, _| Ok(id_from_email(email).map(stored_user)));
        self
    }

    /// Accept user mirror upserts.
    pub fn with_user_upserts(mut self) -> Self {
        self.user_writer.expect_upsert_user().returning(|new_user| {
            Ok(User {
                id: id_from_email(&new_user.email).unwrap_or_default(),
                hub_id: new_user.hub_id,
                name: new_user.name.clone(),
                email: new_user.email.clone(),
            })
        });
        self
    }

    /// Pricing configuration of a 100 EUR/night listing with no fees or taxes.
    pub fn with_plain_pricing(mut self) -> Self {
        self.pricing_reader
            .expect_get_active_priceable_item()
            .returning(|_| Ok(Some(priceable_item(10_000))));
        self.pricing_reader
            .expect_list_pricing_periods()
            .returning(|_| Ok(Vec::new()));
        self.fee_reader.expect_list_fees().returning(|_| Ok(Vec::new()));
        self.tax_reader.expect_list_taxes().returning(|_| Ok(Vec::new()));
        self.tax_reader
            .expect_list_tax_exemptions()
            .returning(|_| Ok(Vec::new()));
        self
    }
}

impl UserReader for FakeRepo {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>> {
        self.user_reader.get_user_by_id(id)
    }

    fn get_user_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<User>> {
        self.user_reader.get_user_by_email(email, hub_id)
    }
}

impl UserWriter for FakeRepo {
    fn upsert_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        self.user_writer.upsert_user(new_user)
    }
}

impl AccommodationReader for FakeRepo {
    fn get_accommodation_by_id(&self, id: i32) -> RepositoryResult<Option<Accommodation>> {
        self.accommodation_reader.get_accommodation_by_id(id)
    }
}

impl AccommodationWriter for FakeRepo {
    fn create_accommodation(
        &self,
        new_accommodation: &NewAccommodation,
    ) -> RepositoryResult<Accommodation> {
        self.accommodation_writer.create_accommodation(new_accommodation)
    }
}

impl PricingReader for FakeRepo {
    fn get_active_priceable_item(
        &self,
        owner: OwnerRef,
    ) -> RepositoryResult<Option<PriceableItem>> {
        self.pricing_reader.get_active_priceable_item(owner)
    }

    fn list_pricing_periods(&self, priceable_item_id: i32) -> RepositoryResult<Vec<PricingPeriod>> {
        self.pricing_reader.list_pricing_periods(priceable_item_id)
    }
}

impl PricingWriter for FakeRepo {
    fn set_base_price(&self, new_item: &NewPriceableItem) -> RepositoryResult<PriceableItem> {
        self.pricing_writer.set_base_price(new_item)
    }

    fn create_pricing_period(
        &self,
        new_period: &NewPricingPeriod,
    ) -> RepositoryResult<PricingPeriod> {
        self.pricing_writer.create_pricing_period(new_period)
    }
}

impl FeeReader for FakeRepo {
    fn list_fees(&self, owner: OwnerRef) -> RepositoryResult<Vec<Fee>> {
        self.fee_reader.list_fees(owner)
    }
}

impl FeeWriter for FakeRepo {
    fn create_fee(&self, new_fee: &NewFee) -> RepositoryResult<Fee> {
        self.fee_writer.create_fee(new_fee)
    }
}

impl TaxReader for FakeRepo {
    fn list_taxes(&self, owner: OwnerRef) -> RepositoryResult<Vec<Tax>> {
        self.tax_reader.list_taxes(owner)
    }

    fn list_tax_exemptions(&self, owner: OwnerRef) -> RepositoryResult<Vec<TaxExemption>> {
        self.tax_reader.list_tax_exemptions(owner)
    }
}

impl TaxWriter for FakeRepo {
    fn create_tax(&self, new_tax: &NewTax) -> RepositoryResult<Tax> {
        self.tax_writer.create_tax(new_tax)
    }

    fn create_tax_exemption(
        &self,
        new_exemption: &NewTaxExemption,
    ) -> RepositoryResult<TaxExemption> {
        self.tax_writer.create_tax_exemption(new_exemption)
    }
}

impl AvailabilityReader for FakeRepo {
    fn list_availability(
        &self,
        accommodation_id: i32,
        range: StayRange,
    ) -> RepositoryResult<Vec<AvailabilityPeriod>> {
        self.availability_reader.list_availability(accommodation_id, range)
    }
}

impl AvailabilityWriter for FakeRepo {
    fn create_availability_periods(
        &self,
        new_periods: &[NewAvailabilityPeriod],
    ) -> RepositoryResult<usize> {
        self.availability_writer.create_availability_periods(new_periods)
    }
}

impl BookingReader for FakeRepo {
    fn get_booking_by_id(&self, id: i32) -> RepositoryResult<Option<Booking>> {
        self.booking_reader.get_booking_by_id(id)
    }

    fn list_bookings(&self, query: BookingListQuery) -> RepositoryResult<(usize, Vec<Booking>)> {
        self.booking_reader.list_bookings(query)
    }
}

impl BookingWriter for FakeRepo {
    fn create_booking(&self, new_booking: &NewBooking) -> RepositoryResult<Booking> {
        self.booking_writer.create_booking(new_booking)
    }

    fn apply_booking_transition(
        &self,
        booking_id: i32,
        transition: &BookingTransition,
    ) -> RepositoryResult<Booking> {
        self.booking_writer.apply_booking_transition(booking_id, transition)
    }

    fn update_payment_status(
        &self,
        booking_id: i32,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> RepositoryResult<Booking> {
        self.booking_writer.update_payment_status(booking_id, from, to)
    }
}
