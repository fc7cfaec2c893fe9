use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UnknownVariant;
use super::availability::{NewAvailabilityPeriod, StayRange};
use super::quote::PriceBreakdown;

/// Lifecycle state of a booking. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Declined,
    Completed,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Declined,
        BookingStatus::Completed,
        BookingStatus::NoShow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Declined => "declined",
            BookingStatus::Completed => "completed",
            BookingStatus::NoShow => "no_show",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled
                | BookingStatus::Declined
                | BookingStatus::Completed
                | BookingStatus::NoShow
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "declined" => Ok(BookingStatus::Declined),
            "completed" => Ok(BookingStatus::Completed),
            "no_show" => Ok(BookingStatus::NoShow),
            other => Err(UnknownVariant::new("booking status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Refunded,
    PartiallyRefunded,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::PartiallyRefunded => "partially_refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            "partially_refunded" => Ok(PaymentStatus::PartiallyRefunded),
            other => Err(UnknownVariant::new("payment status", other)),
        }
    }
}

/// Party triggering a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Host,
    Guest,
    System,
}

impl Actor {
    pub fn as_str(self) -> &'static str {
        match self {
            Actor::Host => "host",
            Actor::Guest => "guest",
            Actor::System => "system",
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Actor {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "host" => Ok(Actor::Host),
            "guest" => Ok(Actor::Guest),
            "system" => Ok(Actor::System),
            other => Err(UnknownVariant::new("actor", other)),
        }
    }
}

/// Requested change of booking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    Confirm,
    Decline,
    Cancel,
    Complete,
    MarkNoShow,
}

impl BookingAction {
    pub const ALL: [BookingAction; 5] = [
        BookingAction::Confirm,
        BookingAction::Decline,
        BookingAction::Cancel,
        BookingAction::Complete,
        BookingAction::MarkNoShow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookingAction::Confirm => "confirm",
            BookingAction::Decline => "decline",
            BookingAction::Cancel => "cancel",
            BookingAction::Complete => "complete",
            BookingAction::MarkNoShow => "mark_no_show",
        }
    }

    /// States the action may be applied from.
    pub fn sources(self) -> &'static [BookingStatus] {
        match self {
            BookingAction::Confirm | BookingAction::Decline => &[BookingStatus::Pending],
            BookingAction::Cancel => &[BookingStatus::Pending, BookingStatus::Confirmed],
            BookingAction::Complete | BookingAction::MarkNoShow => &[BookingStatus::Confirmed],
        }
    }

    pub fn target(self) -> BookingStatus {
        match self {
            BookingAction::Confirm => BookingStatus::Confirmed,
            BookingAction::Decline => BookingStatus::Declined,
            BookingAction::Cancel => BookingStatus::Cancelled,
            BookingAction::Complete => BookingStatus::Completed,
            BookingAction::MarkNoShow => BookingStatus::NoShow,
        }
    }

    pub fn permits(self, actor: Actor) -> bool {
        match self {
            BookingAction::Confirm | BookingAction::Decline | BookingAction::MarkNoShow => {
                actor == Actor::Host
            }
            BookingAction::Cancel => matches!(actor, Actor::Host | Actor::Guest),
            BookingAction::Complete => actor == Actor::System,
        }
    }
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{actor} may not {action} a booking")]
    NotPermitted { action: BookingAction, actor: Actor },
    #[error("cannot {action} a booking that is {from}")]
    InvalidState {
        action: BookingAction,
        from: BookingStatus,
    },
}

impl BookingStatus {
    /// Resolve the state reached by applying `action` as `actor`.
    ///
    /// The actor is checked before the source state.
    pub fn apply(
        self,
        action: BookingAction,
        actor: Actor,
    ) -> Result<BookingStatus, TransitionError> {
        if !action.permits(actor) {
            return Err(TransitionError::NotPermitted { action, actor });
        }

        if !action.sources().contains(&self) {
            return Err(TransitionError::InvalidState { action, from: self });
        }

        Ok(action.target())
    }
}

/// A reservation record with its frozen price snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i32,
    pub accommodation_id: i32,
    pub guest_id: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub currency: String,
    pub subtotal_cents: i64,
    pub fees_total_cents: i64,
    pub taxes_total_cents: i64,
    pub total_price_cents: i64,
    pub price_breakdown: PriceBreakdown,
    pub refund_amount_cents: Option<i64>,
    pub guest_notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub decline_reason: Option<String>,
    pub cancelled_by: Option<Actor>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub declined_at: Option<NaiveDateTime>,
    pub cancelled_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub no_show_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    /// Stay range of the booking. Stored rows always satisfy `check_out > check_in`.
    pub fn stay(&self) -> Option<StayRange> {
        StayRange::new(self.check_in, self.check_out).ok()
    }
}

/// Payload required to insert a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub accommodation_id: i32,
    pub guest_id: i32,
    pub status: BookingStatus,
    pub stay: StayRange,
    pub guests: i32,
    pub price_breakdown: PriceBreakdown,
    pub guest_notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl NewBooking {
    pub fn new(
        accommodation_id: i32,
        guest_id: i32,
        stay: StayRange,
        guests: i32,
        price_breakdown: PriceBreakdown,
    ) -> Self {
        Self {
            accommodation_id,
            guest_id,
            status: BookingStatus::Pending,
            stay,
            guests,
            price_breakdown,
            guest_notes: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Create the booking already confirmed, as instant listings do.
    pub fn confirmed(mut self) -> Self {
        self.status = BookingStatus::Confirmed;
        self
    }

    pub fn with_guest_notes(mut self, notes: impl Into<String>) -> Self {
        self.guest_notes = Some(notes.into());
        self
    }
}

/// Calendar side effect committed together with a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum ReservationChange {
    None,
    /// Insert a booked period after checking the range is still free.
    Reserve(NewAvailabilityPeriod),
    /// Remove every period held by the booking.
    Release,
}

/// Status change persisted atomically by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingTransition {
    pub action: BookingAction,
    pub actor: Actor,
    pub reason: Option<String>,
    pub refund_amount_cents: Option<i64>,
    pub payment_status: Option<PaymentStatus>,
    pub reservation: ReservationChange,
    pub at: NaiveDateTime,
}

impl BookingTransition {
    pub fn new(action: BookingAction, actor: Actor, at: NaiveDateTime) -> Self {
        Self {
            action,
            actor,
            reason: None,
            refund_amount_cents: None,
            payment_status: None,
            reservation: ReservationChange::None,
            at,
        }
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    pub fn with_refund(
        mut self,
        refund_amount_cents: i64,
        payment_status: Option<PaymentStatus>,
    ) -> Self {
        self.refund_amount_cents = Some(refund_amount_cents);
        self.payment_status = payment_status;
        self
    }

    pub fn with_reservation(mut self, reservation: ReservationChange) -> Self {
        self.reservation = reservation;
        self
    }

    pub fn target(&self) -> BookingStatus {
        self.action.target()
    }
}

/// Which side of the booking the listing is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingScope {
    /// Bookings on accommodations hosted by this user.
    Host(i32),
    /// Bookings made by this guest.
    Guest(i32),
    /// Every booking; reserved for admins and system jobs.
    All,
}

/// Query definition used to list bookings.
#[derive(Debug, Clone)]
pub struct BookingListQuery {
    pub scope: BookingScope,
    pub accommodation_id: Option<i32>,
    pub status: Option<BookingStatus>,
    /// Only bookings whose check-out is on or before this date.
    pub check_out_on_or_before: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl BookingListQuery {
    pub fn new(scope: BookingScope) -> Self {
        Self {
            scope,
            accommodation_id: None,
            status: None,
            check_out_on_or_before: None,
            pagination: None,
        }
    }

    pub fn accommodation_id(mut self, accommodation_id: i32) -> Self {
        self.accommodation_id = Some(accommodation_id);
        self
    }

    pub fn status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn check_out_on_or_before(mut self, date: NaiveDate) -> Self {
        self.check_out_on_or_before = Some(date);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
