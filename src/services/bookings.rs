//! Booking lifecycle: creation, host and guest transitions, payments and the
//! scheduled completion of finished stays.

use chrono::{NaiveDate, Utc};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Serialize;

use crate::domain::accommodation::{Accommodation, BookingMode};
use crate::domain::availability::{AvailabilityCheck, NewAvailabilityPeriod, StayRange};
use crate::domain::booking::{
    Actor, Booking, BookingAction, BookingListQuery, BookingScope, BookingStatus,
    BookingTransition, NewBooking, PaymentStatus, ReservationChange, TransitionError,
};
use crate::domain::money::apply_basis_points;
use crate::forms::bookings::{
    BookingRole, BookingsQuery, CreateBookingForm, MAX_ITEMS_PER_PAGE, TransitionForm,
};
use crate::notifications::{BookingEvent, BookingNotification, Notifier};
use crate::pricing::PricingError;
use crate::repository::{
    AccommodationReader, AvailabilityReader, BookingReader, BookingWriter, FeeReader,
    PricingReader, TaxReader, UserReader, UserWriter,
};
use crate::services::quotes::{load_bookable_accommodation, price_stay};
use crate::services::{Caller, ServiceError, ServiceResult};

/// Refund share granted when the host cancels.
const FULL_REFUND_BP: i64 = 10_000;

/// A page of the bookings index.
#[derive(Serialize)]
pub struct BookingsPage {
    pub bookings: Paginated<Booking>,
    pub total: usize,
    pub per_page: usize,
}

impl BookingsPage {
    fn new(bookings: Vec<Booking>, page: usize, per_page: usize, total: usize) -> Self {
        Self {
            bookings: Paginated::new(bookings, page, total.div_ceil(per_page)),
            total,
            per_page,
        }
    }
}

/// Creates a booking for the signed-in guest.
///
/// Request-to-book listings start `pending`. Instant listings start
/// `confirmed` and reserve their dates in the same transaction. The quoted
/// breakdown is stored with the booking and never recomputed.
pub fn create_booking<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    form: CreateBookingForm,
) -> ServiceResult<Booking>
where
    R: AccommodationReader
        + AvailabilityReader
        + PricingReader
        + FeeReader
        + TaxReader
        + BookingWriter
        + UserReader
        + UserWriter
        + ?Sized,
    N: Notifier + ?Sized,
{
    let caller = Caller::resolve(repo, user)?;
    let request = form.into_booking_request()?;
    let accommodation = load_bookable_accommodation(repo, request.accommodation_id)?;

    if caller.id.is_some_and(|id| accommodation.is_hosted_by(id)) {
        return Err(ServiceError::Forbidden);
    }

    let stay = request.quote.stay;
    let periods = repo.list_availability(accommodation.id, stay)?;
    let check = AvailabilityCheck::evaluate(accommodation.id, stay, &periods);
    if let Some(message) = check.conflict_message() {
        return Err(ServiceError::Conflict(message));
    }

    let breakdown = price_stay(repo, &accommodation, &request.quote)?;

    let guest_id = Caller::mirror(repo, user)?
        .id
        .ok_or_else(ServiceError::unauthorized)?;

    let mut new_booking =
        NewBooking::new(accommodation.id, guest_id, stay, request.quote.guests, breakdown);
    if let Some(notes) = request.guest_notes {
        new_booking = new_booking.with_guest_notes(notes);
    }
    if accommodation.booking_mode == BookingMode::Instant {
        new_booking = new_booking.confirmed();
    }

    let booking = repo.create_booking(&new_booking)?;
    log::info!(
        "Booking {} created as {} for accommodation {}",
        booking.id,
        booking.status,
        accommodation.id
    );

    match booking.status {
        BookingStatus::Confirmed => notify_parties(
            repo,
            notifier,
            BookingEvent::Confirmed,
            &booking,
            &[booking.guest_id, accommodation.host_id],
        ),
        _ => notify_parties(
            repo,
            notifier,
            BookingEvent::Requested,
            &booking,
            &[accommodation.host_id],
        ),
    }

    Ok(booking)
}

/// Lists bookings the user made, or with `role=host` the bookings on the
/// accommodations they host.
pub fn list_bookings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: BookingsQuery,
) -> ServiceResult<BookingsPage>
where
    R: BookingReader + UserReader + ?Sized,
{
    let caller = Caller::resolve(repo, user)?;
    let filter = query.into_filter()?;

    let per_page = filter
        .per_page
        .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
        .clamp(1, MAX_ITEMS_PER_PAGE);

    // Nobody has booked or hosted anything before their first mirror.
    let Some(user_id) = caller.id else {
        return Ok(BookingsPage::new(Vec::new(), filter.page, per_page, 0));
    };

    let scope = match filter.role {
        BookingRole::Guest => BookingScope::Guest(user_id),
        BookingRole::Host => BookingScope::Host(user_id),
    };

    let mut list_query = BookingListQuery::new(scope).paginate(filter.page, per_page);
    if let Some(status) = filter.status {
        list_query = list_query.status(status);
    }
    if let Some(accommodation_id) = filter.accommodation_id {
        list_query = list_query.accommodation_id(accommodation_id);
    }

    let (total, bookings) = repo.list_bookings(list_query)?;
    Ok(BookingsPage::new(bookings, filter.page, per_page, total))
}

/// Shows a booking to its guest, its host or an admin.
pub fn get_booking<R>(repo: &R, user: &AuthenticatedUser, booking_id: i32) -> ServiceResult<Booking>
where
    R: BookingReader + AccommodationReader + UserReader + ?Sized,
{
    let caller = Caller::resolve(repo, user)?;
    let (booking, _) = load_visible_booking(repo, &caller, booking_id)?;
    Ok(booking)
}

/// Host accepts a pending request and reserves its dates.
pub fn confirm_booking<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    booking_id: i32,
) -> ServiceResult<Booking>
where
    R: BookingReader + BookingWriter + AccommodationReader + UserReader + ?Sized,
    N: Notifier + ?Sized,
{
    let caller = Caller::resolve(repo, user)?;
    let (booking, accommodation) = load_visible_booking(repo, &caller, booking_id)?;
    let actor = authorize(&caller, &booking, &accommodation, BookingAction::Confirm)?;
    let stay = stored_stay(&booking)?;

    let transition = BookingTransition::new(BookingAction::Confirm, actor, Utc::now().naive_utc())
        .with_reservation(ReservationChange::Reserve(NewAvailabilityPeriod::reservation(
            accommodation.id,
            stay,
        )));

    let updated = repo.apply_booking_transition(booking.id, &transition)?;
    notify_parties(repo, notifier, BookingEvent::Confirmed, &updated, &[updated.guest_id]);
    Ok(updated)
}

/// Host turns down a pending request.
pub fn decline_booking<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    booking_id: i32,
    form: TransitionForm,
) -> ServiceResult<Booking>
where
    R: BookingReader + BookingWriter + AccommodationReader + UserReader + ?Sized,
    N: Notifier + ?Sized,
{
    let reason = form.into_reason()?;
    let caller = Caller::resolve(repo, user)?;
    let (booking, accommodation) = load_visible_booking(repo, &caller, booking_id)?;
    let actor = authorize(&caller, &booking, &accommodation, BookingAction::Decline)?;

    let transition = BookingTransition::new(BookingAction::Decline, actor, Utc::now().naive_utc())
        .with_reason(reason);

    let updated = repo.apply_booking_transition(booking.id, &transition)?;
    notify_parties(repo, notifier, BookingEvent::Declined, &updated, &[updated.guest_id]);
    Ok(updated)
}

/// Guest or host cancels a pending or confirmed booking.
///
/// Paid bookings get a refund of the refundable part of the stored breakdown:
/// in full when the host cancels, by the listing's policy when the guest does.
pub fn cancel_booking<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    booking_id: i32,
    form: TransitionForm,
) -> ServiceResult<Booking>
where
    R: BookingReader + BookingWriter + AccommodationReader + UserReader + ?Sized,
    N: Notifier + ?Sized,
{
    let reason = form.into_reason()?;
    let caller = Caller::resolve(repo, user)?;
    let (booking, accommodation) = load_visible_booking(repo, &caller, booking_id)?;
    let actor = authorize(&caller, &booking, &accommodation, BookingAction::Cancel)?;

    let now = Utc::now().naive_utc();
    let mut transition =
        BookingTransition::new(BookingAction::Cancel, actor, now).with_reason(reason);

    if booking.payment_status == PaymentStatus::Paid {
        let refund = refund_amount(&booking, &accommodation, actor, now.date())?;
        let payment_status = if refund == 0 {
            None
        } else if refund >= booking.total_price_cents {
            Some(PaymentStatus::Refunded)
        } else {
            Some(PaymentStatus::PartiallyRefunded)
        };
        transition = transition.with_refund(refund, payment_status);
    }

    if booking.status == BookingStatus::Confirmed {
        transition = transition.with_reservation(ReservationChange::Release);
    }

    let updated = repo.apply_booking_transition(booking.id, &transition)?;
    log::info!("Booking {} cancelled by {actor}", updated.id);
    notify_parties(
        repo,
        notifier,
        BookingEvent::Cancelled,
        &updated,
        &[updated.guest_id, accommodation.host_id],
    );
    Ok(updated)
}

/// Host reports that the guest never arrived. Only possible from check-in on.
pub fn mark_no_show<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    booking_id: i32,
) -> ServiceResult<Booking>
where
    R: BookingReader + BookingWriter + AccommodationReader + UserReader + ?Sized,
    N: Notifier + ?Sized,
{
    let caller = Caller::resolve(repo, user)?;
    let (booking, accommodation) = load_visible_booking(repo, &caller, booking_id)?;
    let actor = authorize(&caller, &booking, &accommodation, BookingAction::MarkNoShow)?;

    let now = Utc::now().naive_utc();
    if booking.check_in > now.date() {
        return Err(ServiceError::Conflict(
            "a no-show can only be reported from the check-in date".to_string(),
        ));
    }

    let transition = BookingTransition::new(BookingAction::MarkNoShow, actor, now);
    let updated = repo.apply_booking_transition(booking.id, &transition)?;
    notify_parties(repo, notifier, BookingEvent::NoShow, &updated, &[updated.guest_id]);
    Ok(updated)
}

/// Admin records that a booking has been paid.
pub fn record_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    booking_id: i32,
) -> ServiceResult<Booking>
where
    R: BookingReader + BookingWriter + AccommodationReader + UserReader + ?Sized,
{
    let caller = Caller::resolve(repo, user)?;
    if !caller.is_admin() {
        return Err(ServiceError::Forbidden);
    }

    let (booking, _) = load_visible_booking(repo, &caller, booking_id)?;
    if booking.status.is_terminal() {
        return Err(ServiceError::Conflict(format!(
            "cannot record a payment for a booking that is {}",
            booking.status
        )));
    }
    if booking.payment_status != PaymentStatus::Unpaid {
        return Err(ServiceError::Conflict(format!(
            "booking payment is already {}",
            booking.payment_status.as_str()
        )));
    }

    Ok(repo.update_payment_status(booking.id, PaymentStatus::Unpaid, PaymentStatus::Paid)?)
}

/// Completes every confirmed booking whose check-out is on or before `today`.
///
/// Returns how many bookings were completed. A booking changed concurrently
/// is skipped.
pub fn complete_finished_stays<R, N>(
    repo: &R,
    notifier: &N,
    today: NaiveDate,
) -> ServiceResult<usize>
where
    R: BookingReader + BookingWriter + UserReader + ?Sized,
    N: Notifier + ?Sized,
{
    let query = BookingListQuery::new(BookingScope::All)
        .status(BookingStatus::Confirmed)
        .check_out_on_or_before(today);
    let (_, due) = repo.list_bookings(query)?;

    let mut completed = 0;
    for booking in due {
        match complete_booking(repo, &booking, today) {
            Ok(updated) => {
                completed += 1;
                notify_parties(
                    repo,
                    notifier,
                    BookingEvent::Completed,
                    &updated,
                    &[updated.guest_id],
                );
            }
            Err(ServiceError::Conflict(message)) => {
                log::warn!("Skipping completion of booking {}: {message}", booking.id);
            }
            Err(err) => {
                log::error!("Failed to complete booking {}: {err}", booking.id);
            }
        }
    }

    Ok(completed)
}

fn complete_booking<R>(repo: &R, booking: &Booking, today: NaiveDate) -> ServiceResult<Booking>
where
    R: BookingWriter + ?Sized,
{
    booking
        .status
        .apply(BookingAction::Complete, Actor::System)
        .map_err(transition_error)?;
    if booking.check_out > today {
        return Err(ServiceError::Conflict(
            "a stay can only be completed from the check-out date".to_string(),
        ));
    }

    let transition =
        BookingTransition::new(BookingAction::Complete, Actor::System, Utc::now().naive_utc());
    Ok(repo.apply_booking_transition(booking.id, &transition)?)
}

/// Refund owed on cancellation, before checking the payment status.
fn refund_amount(
    booking: &Booking,
    accommodation: &Accommodation,
    actor: Actor,
    today: NaiveDate,
) -> Result<i64, PricingError> {
    let share_bp = match actor {
        Actor::Host => FULL_REFUND_BP,
        _ => {
            let days_before_check_in = (booking.check_in - today).num_days();
            accommodation.cancellation_policy.refund_basis_points(days_before_check_in)
        }
    };

    booking
        .price_breakdown
        .refundable_cents()
        .and_then(|refundable| apply_basis_points(refundable, share_bp))
        .ok_or(PricingError::AmountOverflow)
}

/// Load a booking and its accommodation, hiding both from unrelated users.
fn load_visible_booking<R>(
    repo: &R,
    caller: &Caller<'_>,
    booking_id: i32,
) -> ServiceResult<(Booking, Accommodation)>
where
    R: BookingReader + AccommodationReader + ?Sized,
{
    let booking = repo.get_booking_by_id(booking_id)?.ok_or_else(ServiceError::not_found)?;
    let accommodation = repo
        .get_accommodation_by_id(booking.accommodation_id)?
        .ok_or_else(|| {
            ServiceError::Internal(format!(
                "booking {booking_id} references a missing accommodation"
            ))
        })?;

    if !caller.is(booking.guest_id) && !caller.can_host(&accommodation) {
        return Err(ServiceError::not_found());
    }

    Ok((booking, accommodation))
}

/// Pick the role `user` acts in and check the action is allowed from the
/// current status. Permission is checked before state.
fn authorize(
    caller: &Caller<'_>,
    booking: &Booking,
    accommodation: &Accommodation,
    action: BookingAction,
) -> ServiceResult<Actor> {
    let mut roles = Vec::with_capacity(2);
    if caller.is(booking.guest_id) {
        roles.push(Actor::Guest);
    }
    if caller.can_host(accommodation) {
        roles.push(Actor::Host);
    }

    let actor = roles
        .iter()
        .copied()
        .find(|actor| action.permits(*actor))
        .or(roles.first().copied())
        .ok_or_else(ServiceError::not_found)?;

    booking.status.apply(action, actor).map_err(transition_error)?;
    Ok(actor)
}

fn transition_error(err: TransitionError) -> ServiceError {
    match err {
        TransitionError::NotPermitted { .. } => ServiceError::Forbidden,
        TransitionError::InvalidState { .. } => ServiceError::Conflict(err.to_string()),
    }
}

fn stored_stay(booking: &Booking) -> ServiceResult<StayRange> {
    booking.stay().ok_or_else(|| {
        ServiceError::Internal(format!("booking {} has an invalid stay range", booking.id))
    })
}

/// Best effort: a missing recipient or a lookup failure only logs.
fn notify_parties<R, N>(
    repo: &R,
    notifier: &N,
    event: BookingEvent,
    booking: &Booking,
    recipients: &[i32],
)
where
    R: UserReader + ?Sized,
    N: Notifier + ?Sized,
{
    for &user_id in recipients {
        match repo.get_user_by_id(user_id) {
            Ok(Some(recipient)) => {
                notifier.notify(BookingNotification::render(event, booking, &recipient))
            }
            Ok(None) => log::warn!("No user {user_id} to notify about booking {}", booking.id),
            Err(err) => log::warn!(
                "Failed to load user {user_id} for booking {} notification: {err}",
                booking.id
            ),
        }
    }
}
