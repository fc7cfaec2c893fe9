//! Helpers for integration tests.
#![allow(dead_code)]

use chrono::{Days, NaiveDate, Utc};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

use pushkind_bookings::domain::accommodation::{
    Accommodation, BookingMode, CancellationPolicy, NewAccommodation,
};
use pushkind_bookings::domain::availability::StayRange;
use pushkind_bookings::domain::owner::PriceableOwner;
use pushkind_bookings::domain::pricing::{NewPriceableItem, PricingType};
use pushkind_bookings::domain::user::NewUser;
use pushkind_bookings::repository::{
    AccommodationWriter, DieselRepository, PricingWriter, UserWriter,
};
use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_common::domain::auth::AuthenticatedUser;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub const HUB_ID: i32 = 1;
pub const HOST_ID: i32 = 1;
pub const GUEST_ID: i32 = 2;
pub const OTHER_GUEST_ID: i32 = 3;

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    // Keeps the directory alive for as long as the pool.
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temporary directory.");
        let path = dir.path().join("bookings.db");

        let pool = establish_connection_pool(&path.to_string_lossy())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");

        DieselRepository::new(pool.clone())
            .enable_wal()
            .expect("WAL enabled");

        TestDb { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn session_user(id: i32, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: format!("user-{id}"),
        email: format!("user{id}@example.com"),
        hub_id: HUB_ID,
        name: format!("User {id}"),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        exp: Utc::now().timestamp() + 3600,
    }
}

/// Mirror the host and both guests, in id order, into a fresh database.
pub fn seed_users(repo: &DieselRepository) {
    for id in [HOST_ID, GUEST_ID, OTHER_GUEST_ID] {
        let user = repo
            .upsert_user(&NewUser::new(
                HUB_ID,
                format!("User {id}"),
                format!("user{id}@example.com"),
            ))
            .expect("user stored");
        assert_eq!(user.id, id, "users must be seeded into an empty database");
    }
}

/// Listing hosted by `HOST_ID` priced at `nightly_cents` EUR per night.
pub fn seed_listing(
    repo: &DieselRepository,
    mode: BookingMode,
    policy: CancellationPolicy,
    nightly_cents: i64,
) -> Accommodation {
    let accommodation = repo
        .create_accommodation(
            &NewAccommodation::new(HUB_ID, HOST_ID, "Harbour Loft", 4)
                .with_booking_mode(mode)
                .with_cancellation_policy(policy),
        )
        .expect("accommodation stored");

    repo.set_base_price(&NewPriceableItem::new(
        accommodation.owner_ref(),
        PricingType::Nightly,
        nightly_cents,
        "EUR",
    ))
    .expect("base price stored");

    accommodation
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn range(start: NaiveDate, nights: u64) -> StayRange {
    StayRange::new(start, start + Days::new(nights)).unwrap()
}

/// Date `days` from today; negative values count backwards.
pub fn days_from_today(days: i64) -> NaiveDate {
    let today = Utc::now().date_naive();
    if days >= 0 {
        today + Days::new(days as u64)
    } else {
        today - Days::new(days.unsigned_abs())
    }
}
