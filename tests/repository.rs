use chrono::Utc;

use pushkind_bookings::domain::accommodation::{BookingMode, CancellationPolicy};
use pushkind_bookings::domain::availability::{
    AvailabilityStatus, NewAvailabilityPeriod, StayRange,
};
use pushkind_bookings::domain::booking::{
    Actor, BookingAction, BookingListQuery, BookingScope, BookingStatus, BookingTransition,
    NewBooking, PaymentStatus, ReservationChange,
};
use pushkind_bookings::domain::owner::PriceableOwner;
use pushkind_bookings::domain::pricing::{NewPriceableItem, PricingType};
use pushkind_bookings::domain::quote::PriceBreakdown;
use pushkind_bookings::domain::user::NewUser;
use pushkind_bookings::forms::quotes::QuoteForm;
use pushkind_bookings::repository::errors::RepositoryError;
use pushkind_bookings::repository::{
    AvailabilityReader, AvailabilityWriter, BookingReader, BookingWriter, DieselRepository,
    PricingReader, PricingWriter, UserReader, UserWriter,
};
use pushkind_bookings::services::quotes::quote_price;

mod common;

use common::{GUEST_ID, HOST_ID, HUB_ID, OTHER_GUEST_ID, date, range, seed_listing, seed_users};

fn quote(repo: &DieselRepository, accommodation_id: i32, stay: StayRange) -> PriceBreakdown {
    quote_price(
        repo,
        accommodation_id,
        QuoteForm {
            check_in: stay.start(),
            check_out: stay.end(),
            guests: 2,
            optional_fee_ids: Vec::new(),
        },
    )
    .expect("quote")
}

fn booking_request(
    repo: &DieselRepository,
    accommodation_id: i32,
    guest_id: i32,
    stay: StayRange,
) -> NewBooking {
    NewBooking::new(accommodation_id, guest_id, stay, 2, quote(repo, accommodation_id, stay))
}

fn host_confirmation(accommodation_id: i32, stay: StayRange) -> BookingTransition {
    let reservation = NewAvailabilityPeriod::reservation(accommodation_id, stay);
    BookingTransition::new(BookingAction::Confirm, Actor::Host, Utc::now().naive_utc())
        .with_reservation(ReservationChange::Reserve(reservation))
}

#[test]
fn test_user_upsert_refreshes_details() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);

    let stored = repo.get_user_by_id(GUEST_ID).unwrap().expect("guest stored");
    assert_eq!(stored.email, "user2@example.com");
    assert!(repo.get_user_by_id(404).unwrap().is_none());

    let renamed = repo
        .upsert_user(&NewUser::new(HUB_ID, "Grace", " USER2@example.com "))
        .unwrap();
    assert_eq!(renamed.id, GUEST_ID);
    assert_eq!(renamed.name, "Grace");

    let found = repo
        .get_user_by_email("User2@Example.com", HUB_ID)
        .unwrap()
        .expect("found by email");
    assert_eq!(found.id, GUEST_ID);
}

#[test]
fn test_users_are_scoped_to_their_hub() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);

    assert!(repo.get_user_by_email("user2@example.com", HUB_ID + 1).unwrap().is_none());

    let other_hub = repo
        .upsert_user(&NewUser::new(HUB_ID + 1, "User 2", "user2@example.com"))
        .unwrap();
    assert_ne!(other_hub.id, GUEST_ID);
}

#[test]
fn test_setting_base_price_replaces_active_item() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Request, CancellationPolicy::Flexible, 10_000);

    repo.set_base_price(&NewPriceableItem::new(
        listing.owner_ref(),
        PricingType::Nightly,
        12_500,
        "EUR",
    ))
    .unwrap();

    let active = repo
        .get_active_priceable_item(listing.owner_ref())
        .unwrap()
        .expect("active item");
    assert_eq!(active.base_price_cents, 12_500);
}

#[test]
fn test_confirmed_booking_reserves_dates_and_blocks_overlaps() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Instant, CancellationPolicy::Flexible, 10_000);

    let stay = range(date(2025, 8, 10), 4);
    let breakdown = quote(&repo, listing.id, stay);
    let booking = repo
        .create_booking(
            &NewBooking::new(listing.id, GUEST_ID, stay, 2, breakdown.clone()).confirmed(),
        )
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.total_price_cents, 40_000);
    assert_eq!(booking.price_breakdown, breakdown);

    let calendar = repo.list_availability(listing.id, stay).unwrap();
    assert_eq!(calendar.len(), 1);
    assert_eq!(calendar[0].status, AvailabilityStatus::Booked);
    assert_eq!(calendar[0].booking_id, Some(booking.id));

    let overlapping = range(date(2025, 8, 12), 3);
    let err = repo
        .create_booking(
            &booking_request(&repo, listing.id, OTHER_GUEST_ID, overlapping).confirmed(),
        )
        .expect_err("overlap must fail");
    assert!(matches!(err, RepositoryError::Conflict(_)));

    // The failed insert rolled back with its reservation check.
    let (total, _) = repo.list_bookings(BookingListQuery::new(BookingScope::All)).unwrap();
    assert_eq!(total, 1);

    let turnover = range(date(2025, 8, 14), 2);
    repo.create_booking(&booking_request(&repo, listing.id, OTHER_GUEST_ID, turnover).confirmed())
    .expect("same-day turnover is allowed");
}

#[test]
fn test_transition_checks_stored_status() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Request, CancellationPolicy::Flexible, 10_000);

    let stay = range(date(2025, 9, 1), 2);
    let booking = repo
        .create_booking(&booking_request(&repo, listing.id, GUEST_ID, stay))
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert!(repo.list_availability(listing.id, stay).unwrap().is_empty());

    let confirm = host_confirmation(listing.id, stay);

    let confirmed = repo.apply_booking_transition(booking.id, &confirm).unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert!(confirmed.confirmed_at.is_some());

    let err = repo
        .apply_booking_transition(booking.id, &confirm)
        .expect_err("second confirm must fail");
    assert!(
        matches!(err, RepositoryError::Conflict(ref message)
            if message == "cannot confirm a booking that is confirmed")
    );
    assert_eq!(repo.list_availability(listing.id, stay).unwrap().len(), 1);

    let cancel = BookingTransition::new(BookingAction::Cancel, Actor::Guest, Utc::now().naive_utc())
        .with_reason(Some("Change of plans".to_string()))
        .with_reservation(ReservationChange::Release);
    let cancelled = repo.apply_booking_transition(booking.id, &cancel).unwrap();

    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by, Some(Actor::Guest));
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Change of plans"));
    assert!(repo.list_availability(listing.id, stay).unwrap().is_empty());
}

#[test]
fn test_owner_blocks_prevent_confirmation() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Request, CancellationPolicy::Flexible, 10_000);

    let stay = range(date(2025, 10, 1), 3);
    let booking = repo
        .create_booking(&booking_request(&repo, listing.id, GUEST_ID, stay))
        .unwrap();

    let block = NewAvailabilityPeriod::blocked(listing.id, range(date(2025, 10, 2), 1));
    repo.create_availability_periods(&[block]).unwrap();

    let confirm = host_confirmation(listing.id, stay);
    let err = repo
        .apply_booking_transition(booking.id, &confirm)
        .expect_err("blocked dates");
    assert!(matches!(err, RepositoryError::Conflict(_)));

    // Status change rolled back with the failed reservation.
    let stored = repo.get_booking_by_id(booking.id).unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);
}

#[test]
fn test_blocks_over_booked_stays_are_rejected_atomically() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Instant, CancellationPolicy::Flexible, 10_000);

    let stay = range(date(2025, 10, 10), 3);
    repo.create_booking(
        &booking_request(&repo, listing.id, GUEST_ID, stay).confirmed(),
    )
    .unwrap();

    let free = NewAvailabilityPeriod::blocked(listing.id, range(date(2025, 10, 1), 2));
    let clashing = NewAvailabilityPeriod::blocked(listing.id, range(date(2025, 10, 12), 2));
    let err = repo
        .create_availability_periods(&[free, clashing])
        .expect_err("booked dates cannot be blocked");
    assert!(
        matches!(err, RepositoryError::Conflict(ref message) if message.contains("are booked"))
    );

    // Nothing from the rejected batch was stored.
    let october = range(date(2025, 10, 1), 31);
    let calendar = repo.list_availability(listing.id, october).unwrap();
    assert_eq!(calendar.len(), 1);
    assert_eq!(calendar[0].status, AvailabilityStatus::Booked);

    // Blocks may still overlap other blocks and touch the stay.
    let created = repo
        .create_availability_periods(&[
            NewAvailabilityPeriod::blocked(listing.id, range(date(2025, 10, 1), 3)),
            NewAvailabilityPeriod::blocked(listing.id, range(date(2025, 10, 2), 8)),
        ])
        .unwrap();
    assert_eq!(created, 2);
}

#[test]
fn test_pages_beyond_addressable_range_are_empty() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Request, CancellationPolicy::Flexible, 10_000);

    let stay = range(date(2025, 11, 1), 2);
    repo.create_booking(&booking_request(&repo, listing.id, GUEST_ID, stay))
        .unwrap();

    let (total, page) = repo
        .list_bookings(BookingListQuery::new(BookingScope::All).paginate(usize::MAX, 20))
        .unwrap();
    assert_eq!(total, 1);
    assert!(page.is_empty());
}

#[test]
fn test_booking_listing_scopes_and_pages() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Request, CancellationPolicy::Flexible, 10_000);

    for (offset, guest) in [(0, GUEST_ID), (3, GUEST_ID), (6, OTHER_GUEST_ID)] {
        let stay = range(date(2025, 11, 1) + chrono::Days::new(offset), 2);
        repo.create_booking(&booking_request(&repo, listing.id, guest, stay))
            .unwrap();
    }

    let (total, mine) = repo
        .list_bookings(BookingListQuery::new(BookingScope::Guest(GUEST_ID)))
        .unwrap();
    assert_eq!(total, 2);
    assert!(mine.iter().all(|booking| booking.guest_id == GUEST_ID));

    let (total, page) = repo
        .list_bookings(BookingListQuery::new(BookingScope::Host(HOST_ID)).paginate(2, 2))
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].guest_id, OTHER_GUEST_ID);

    let (total, _) = repo
        .list_bookings(BookingListQuery::new(BookingScope::Host(GUEST_ID)))
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn test_payment_status_uses_compare_and_set() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Request, CancellationPolicy::Flexible, 10_000);

    let stay = range(date(2025, 12, 1), 2);
    let booking = repo
        .create_booking(&booking_request(&repo, listing.id, GUEST_ID, stay))
        .unwrap();

    let paid = repo
        .update_payment_status(booking.id, PaymentStatus::Unpaid, PaymentStatus::Paid)
        .unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    let err = repo
        .update_payment_status(booking.id, PaymentStatus::Unpaid, PaymentStatus::Paid)
        .expect_err("already paid");
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let err = repo
        .update_payment_status(9_999, PaymentStatus::Unpaid, PaymentStatus::Paid)
        .expect_err("missing booking");
    assert!(err.is_not_found());
}
