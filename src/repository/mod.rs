use diesel::connection::SimpleConnection;
use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::pagination::Pagination;

use crate::domain::accommodation::{Accommodation, NewAccommodation};
use crate::domain::availability::{AvailabilityPeriod, NewAvailabilityPeriod, StayRange};
use crate::domain::booking::{
    Booking, BookingListQuery, BookingTransition, NewBooking, PaymentStatus,
};
use crate::domain::fee::{Fee, NewFee};
use crate::domain::owner::OwnerRef;
use crate::domain::pricing::{NewPriceableItem, NewPricingPeriod, PriceableItem, PricingPeriod};
use crate::domain::tax::{NewTax, NewTaxExemption, Tax, TaxExemption};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;

pub mod accommodation;
pub mod availability;
pub mod booking;
pub mod errors;
pub mod fee;
pub mod pricing;
pub mod tax;
pub mod user;

#[cfg(test)]
pub mod mock;

/// Applied to every pooled connection before use. Writers wait on the
/// database lock instead of failing straight away.
const CONNECTION_PRAGMAS: &str = "PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;";

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Switch the database to write-ahead logging so readers do not block
    /// the writer. The mode is stored in the database file.
    pub fn enable_wal(&self) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        conn.batch_execute("PRAGMA journal_mode = WAL;")?;
        Ok(())
    }

    /// Pooled connection with the per-connection pragmas applied.
    pub fn conn(&self) -> RepositoryResult<DbConnection> {
        let mut conn = self.pool.get()?;
        conn.batch_execute(CONNECTION_PRAGMAS)?;
        Ok(conn)
    }
}

/// Row offset and limit of a page, or `None` when the page starts beyond
/// anything SQLite can address.
pub(crate) fn page_window(pagination: &Pagination) -> Option<(i64, i64)> {
    let limit = i64::try_from(pagination.per_page).ok()?;
    let offset = (pagination.page.max(1) - 1).checked_mul(pagination.per_page)?;
    Some((i64::try_from(offset).ok()?, limit))
}

/// Read-only access to mirrored platform users.
pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    /// Insert the user or refresh the stored name and email.
    fn upsert_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

pub trait AccommodationReader {
    fn get_accommodation_by_id(&self, id: i32) -> RepositoryResult<Option<Accommodation>>;
}

pub trait AccommodationWriter {
    fn create_accommodation(
        &self,
        new_accommodation: &NewAccommodation,
    ) -> RepositoryResult<Accommodation>;
}

/// Read access to base prices and their pricing periods.
pub trait PricingReader {
    fn get_active_priceable_item(&self, owner: OwnerRef) -> RepositoryResult<Option<PriceableItem>>;
    fn list_pricing_periods(&self, priceable_item_id: i32) -> RepositoryResult<Vec<PricingPeriod>>;
}

pub trait PricingWriter {
    /// Store a new active base price, deactivating the owner's previous one.
    fn set_base_price(&self, new_item: &NewPriceableItem) -> RepositoryResult<PriceableItem>;
    fn create_pricing_period(
        &self,
        new_period: &NewPricingPeriod,
    ) -> RepositoryResult<PricingPeriod>;
}

pub trait FeeReader {
    /// Active fees of `owner` in configuration order.
    fn list_fees(&self, owner: OwnerRef) -> RepositoryResult<Vec<Fee>>;
}

pub trait FeeWriter {
    fn create_fee(&self, new_fee: &NewFee) -> RepositoryResult<Fee>;
}

pub trait TaxReader {
    /// Active taxes of `owner` in configuration order.
    fn list_taxes(&self, owner: OwnerRef) -> RepositoryResult<Vec<Tax>>;
    fn list_tax_exemptions(&self, owner: OwnerRef) -> RepositoryResult<Vec<TaxExemption>>;
}

pub trait TaxWriter {
    fn create_tax(&self, new_tax: &NewTax) -> RepositoryResult<Tax>;
    fn create_tax_exemption(
        &self,
        new_exemption: &NewTaxExemption,
    ) -> RepositoryResult<TaxExemption>;
}

pub trait AvailabilityReader {
    /// Calendar periods of an accommodation overlapping `range`.
    fn list_availability(
        &self,
        accommodation_id: i32,
        range: StayRange,
    ) -> RepositoryResult<Vec<AvailabilityPeriod>>;
}

pub trait AvailabilityWriter {
    fn create_availability_periods(
        &self,
        new_periods: &[NewAvailabilityPeriod],
    ) -> RepositoryResult<usize>;
}

pub trait BookingReader {
    fn get_booking_by_id(&self, id: i32) -> RepositoryResult<Option<Booking>>;
    fn list_bookings(&self, query: BookingListQuery) -> RepositoryResult<(usize, Vec<Booking>)>;
}

/// Booking writes. Every method commits atomically.
pub trait BookingWriter {
    /// Insert a booking. A booking created confirmed reserves its dates in
    /// the same transaction and fails with `Conflict` when they are taken.
    fn create_booking(&self, new_booking: &NewBooking) -> RepositoryResult<Booking>;
    /// Move a booking along the state machine. Fails with `Conflict` when
    /// the stored status no longer allows the action or when a reservation
    /// collides with the calendar.
    fn apply_booking_transition(
        &self,
        booking_id: i32,
        transition: &BookingTransition,
    ) -> RepositoryResult<Booking>;
    /// Change the payment status if it still equals `from`.
    fn update_payment_status(
        &self,
        booking_id: i32,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> RepositoryResult<Booking>;
}
