use std::sync::Barrier;
use std::thread;

use chrono::Utc;

use pushkind_bookings::SERVICE_ACCESS_ROLE;
use pushkind_bookings::domain::accommodation::{BookingMode, CancellationPolicy};
use pushkind_bookings::domain::booking::{
    Actor, BookingStatus, NewBooking, PaymentStatus,
};
use pushkind_bookings::domain::availability::AvailabilityStatus;
use pushkind_bookings::forms::bookings::{CreateBookingForm, TransitionForm};
use pushkind_bookings::forms::pricing::SetBasePriceForm;
use pushkind_bookings::forms::quotes::{AvailabilityQuery, QuoteForm};
use pushkind_bookings::notifications::{BookingEvent, NotificationBuffer};
use pushkind_bookings::repository::{AvailabilityReader, BookingWriter};
use pushkind_bookings::services::ServiceError;
use pushkind_bookings::services::accommodations::set_base_price;
use pushkind_bookings::services::availability::check_availability;
use pushkind_bookings::services::bookings::{
    cancel_booking, complete_finished_stays, confirm_booking, create_booking, get_booking,
    record_payment,
};
use pushkind_bookings::services::quotes::quote_price;

mod common;

use common::{
    GUEST_ID, HOST_ID, HUB_ID, OTHER_GUEST_ID, days_from_today, range, seed_listing, seed_users,
    session_user,
};

fn booking_form(accommodation_id: i32, check_in_in: i64, nights: i64) -> CreateBookingForm {
    CreateBookingForm {
        accommodation_id,
        check_in: days_from_today(check_in_in),
        check_out: days_from_today(check_in_in + nights),
        guests: 2,
        optional_fee_ids: Vec::new(),
        guest_notes: Some("Arriving late".to_string()),
    }
}

#[test]
fn test_request_flow_confirms_once() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Request, CancellationPolicy::Flexible, 10_000);
    let host = session_user(HOST_ID, &[]);
    let guest = session_user(GUEST_ID, &[]);

    let outbox = NotificationBuffer::new();
    let booking = create_booking(&repo, &outbox, &guest, booking_form(listing.id, 30, 3)).unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_price_cents, 30_000);
    assert_eq!(booking.guest_notes.as_deref(), Some("Arriving late"));

    let confirmed = confirm_booking(&repo, &outbox, &host, booking.id).unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let again = confirm_booking(&repo, &outbox, &host, booking.id);
    assert!(matches!(again, Err(ServiceError::Conflict(_))));

    let check = check_availability(
        &repo,
        listing.id,
        AvailabilityQuery {
            check_in: days_from_today(31),
            check_out: days_from_today(32),
        },
    )
    .unwrap();
    assert!(!check.available);
    assert_eq!(check.conflicts[0].status, AvailabilityStatus::Booked);

    let events: Vec<(BookingEvent, String)> = outbox
        .into_inner()
        .into_iter()
        .map(|mail| (mail.event, mail.recipient_email))
        .collect();
    assert_eq!(
        events,
        vec![
            (BookingEvent::Requested, "user1@example.com".to_string()),
            (BookingEvent::Confirmed, "user2@example.com".to_string()),
        ]
    );
}

#[test]
fn test_overlapping_request_is_rejected_after_confirmation() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Instant, CancellationPolicy::Flexible, 10_000);
    let outbox = NotificationBuffer::new();

    create_booking(&repo, &outbox, &session_user(GUEST_ID, &[]), booking_form(listing.id, 10, 4))
        .unwrap();

    let result = create_booking(
        &repo,
        &outbox,
        &session_user(OTHER_GUEST_ID, &[]),
        booking_form(listing.id, 12, 3),
    );
    assert!(matches!(result, Err(ServiceError::Conflict(_))));

    // Check-out day of one stay is the check-in day of the next.
    let turnover = create_booking(
        &repo,
        &outbox,
        &session_user(OTHER_GUEST_ID, &[]),
        booking_form(listing.id, 14, 2),
    )
    .unwrap();
    assert_eq!(turnover.status, BookingStatus::Confirmed);
}

#[test]
fn test_stored_price_survives_repricing() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Request, CancellationPolicy::Flexible, 10_000);
    let host = session_user(HOST_ID, &[]);
    let guest = session_user(GUEST_ID, &[]);

    let booking =
        create_booking(&repo, &NotificationBuffer::new(), &guest, booking_form(listing.id, 20, 2))
            .unwrap();

    set_base_price(
        &repo,
        &host,
        listing.id,
        SetBasePriceForm {
            pricing_type: None,
            base_price: "250.00".to_string(),
            currency: "EUR".to_string(),
            reference_price: None,
            min_quantity: None,
            max_quantity: None,
        },
    )
    .unwrap();

    let requote = quote_price(
        &repo,
        listing.id,
        QuoteForm {
            check_in: booking.check_in,
            check_out: booking.check_out,
            guests: 2,
            optional_fee_ids: Vec::new(),
        },
    )
    .unwrap();
    assert_eq!(requote.total_cents, 50_000);

    let stored = get_booking(&repo, &guest, booking.id).unwrap();
    assert_eq!(stored.total_price_cents, 20_000);
    assert_eq!(stored.price_breakdown, booking.price_breakdown);
}

#[test]
fn test_guest_cancellation_refunds_by_policy() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Instant, CancellationPolicy::Moderate, 10_000);
    let guest = session_user(GUEST_ID, &[]);
    let admin = session_user(99, &[SERVICE_ACCESS_ROLE]);
    let outbox = NotificationBuffer::new();

    let booking = create_booking(&repo, &outbox, &guest, booking_form(listing.id, 3, 2)).unwrap();
    let paid = record_payment(&repo, &admin, booking.id).unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    let cancelled = cancel_booking(
        &repo,
        &outbox,
        &guest,
        booking.id,
        TransitionForm {
            reason: Some("Flight cancelled".to_string()),
        },
    )
    .unwrap();

    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by, Some(Actor::Guest));
    assert_eq!(cancelled.refund_amount_cents, Some(10_000));
    assert_eq!(cancelled.payment_status, PaymentStatus::PartiallyRefunded);

    // Released dates can be booked again.
    let rebooked = create_booking(
        &repo,
        &outbox,
        &session_user(OTHER_GUEST_ID, &[]),
        booking_form(listing.id, 3, 2),
    );
    assert!(rebooked.is_ok());
}

#[test]
fn test_sweep_completes_finished_stays() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Instant, CancellationPolicy::Flexible, 10_000);

    let finished = range(days_from_today(-5), 3);
    let ongoing = range(days_from_today(-1), 3);
    let breakdown = quote_price(
        &repo,
        listing.id,
        QuoteForm {
            check_in: finished.start(),
            check_out: finished.end(),
            guests: 2,
            optional_fee_ids: Vec::new(),
        },
    )
    .unwrap();

    let done = repo
        .create_booking(
            &NewBooking::new(listing.id, GUEST_ID, finished, 2, breakdown.clone()).confirmed(),
        )
        .unwrap();
    let current = repo
        .create_booking(
            &NewBooking::new(listing.id, OTHER_GUEST_ID, ongoing, 2, breakdown).confirmed(),
        )
        .unwrap();

    let outbox = NotificationBuffer::new();
    let today = Utc::now().date_naive();
    assert_eq!(complete_finished_stays(&repo, &outbox, today).unwrap(), 1);
    assert_eq!(complete_finished_stays(&repo, &outbox, today).unwrap(), 0);

    let admin = session_user(99, &[SERVICE_ACCESS_ROLE]);
    let done = get_booking(&repo, &admin, done.id).unwrap();
    assert_eq!(done.status, BookingStatus::Completed);
    assert!(done.completed_at.is_some());
    assert_eq!(get_booking(&repo, &admin, current.id).unwrap().status, BookingStatus::Confirmed);

    let sent = outbox.into_inner();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].event, BookingEvent::Completed);
}

#[test]
fn test_strangers_cannot_see_or_cancel() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Request, CancellationPolicy::Flexible, 10_000);
    let outbox = NotificationBuffer::new();

    let guest = session_user(GUEST_ID, &[]);
    let booking = create_booking(&repo, &outbox, &guest, booking_form(listing.id, 9, 2)).unwrap();
    let stranger = session_user(OTHER_GUEST_ID, &[]);

    assert!(matches!(
        get_booking(&repo, &stranger, booking.id),
        Err(err) if err.is_not_found()
    ));
    assert!(matches!(
        cancel_booking(&repo, &outbox, &stranger, booking.id, TransitionForm::default()),
        Err(err) if err.is_not_found()
    ));

    // Admins of another hub are strangers too.
    let mut foreign_admin = session_user(99, &[SERVICE_ACCESS_ROLE]);
    foreign_admin.hub_id = HUB_ID + 1;
    assert!(matches!(
        get_booking(&repo, &foreign_admin, booking.id),
        Err(err) if err.is_not_found()
    ));
}

#[test]
fn test_concurrent_confirmations_reserve_dates_once() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    seed_users(&repo);
    let listing = seed_listing(&repo, BookingMode::Request, CancellationPolicy::Flexible, 10_000);
    let host = session_user(HOST_ID, &[]);
    let outbox = NotificationBuffer::new();

    let first = create_booking(
        &repo,
        &outbox,
        &session_user(GUEST_ID, &[]),
        booking_form(listing.id, 40, 4),
    )
    .unwrap();
    let second = create_booking(
        &repo,
        &outbox,
        &session_user(OTHER_GUEST_ID, &[]),
        booking_form(listing.id, 42, 4),
    )
    .unwrap();
    assert_eq!(first.status, BookingStatus::Pending);
    assert_eq!(second.status, BookingStatus::Pending);

    let barrier = Barrier::new(2);
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = [first.id, second.id]
            .into_iter()
            .map(|booking_id| {
                let (repo, host, barrier) = (&repo, &host, &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    confirm_booking(repo, &NotificationBuffer::new(), host, booking_id)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("confirming thread panicked"))
            .collect()
    });

    let confirmed = results
        .iter()
        .filter(|result| {
            matches!(result, Ok(booking) if booking.status == BookingStatus::Confirmed)
        })
        .count();
    let conflicts = results
        .iter()
        .filter(|result| matches!(result, Err(ServiceError::Conflict(_))))
        .count();
    assert_eq!(confirmed, 1, "results: {results:?}");
    assert_eq!(conflicts, 1, "results: {results:?}");

    let window = range(days_from_today(40), 6);
    let booked: Vec<_> = repo
        .list_availability(listing.id, window)
        .unwrap()
        .into_iter()
        .filter(|period| period.status == AvailabilityStatus::Booked)
        .collect();
    assert_eq!(booked.len(), 1);
}
