//! Booking mail notifications.
//!
//! Services hand a rendered [`BookingNotification`] to a [`Notifier`] after the
//! booking change is committed. Delivery is best effort: a failed delivery
//! never undoes the booking change.

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

use crate::domain::booking::Booking;
use crate::domain::money::format_cents;
use crate::domain::user::User;

/// What happened to the booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingEvent {
    Requested,
    Confirmed,
    Declined,
    Cancelled,
    Completed,
    NoShow,
}

impl BookingEvent {
    fn subject(self) -> &'static str {
        match self {
            BookingEvent::Requested => "New booking request",
            BookingEvent::Confirmed => "Your booking is confirmed",
            BookingEvent::Declined => "Your booking request was declined",
            BookingEvent::Cancelled => "A booking was cancelled",
            BookingEvent::Completed => "Thank you for your stay",
            BookingEvent::NoShow => "Booking marked as no-show",
        }
    }
}

impl fmt::Display for BookingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingEvent::Requested => "requested",
            BookingEvent::Confirmed => "confirmed",
            BookingEvent::Declined => "declined",
            BookingEvent::Cancelled => "cancelled",
            BookingEvent::Completed => "completed",
            BookingEvent::NoShow => "no_show",
        };
        f.write_str(name)
    }
}

/// A mail ready to be delivered to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingNotification {
    pub event: BookingEvent,
    pub booking_id: i32,
    pub recipient_email: String,
    pub recipient_name: String,
    pub subject: String,
    pub body: String,
}

impl BookingNotification {
    /// Render the mail sent to `recipient` about `booking`.
    pub fn render(event: BookingEvent, booking: &Booking, recipient: &User) -> Self {
        let mut body = format!(
            "Hello {},\n\nBooking #{} for {} to {} ({} guests) is now {}.\nTotal: {} {}.",
            recipient.display_name(),
            booking.id,
            booking.check_in,
            booking.check_out,
            booking.guests,
            booking.status,
            format_cents(booking.total_price_cents),
            booking.currency,
        );

        if let Some(refund) = booking.refund_amount_cents {
            body.push_str(&format!("\nRefund: {} {}.", format_cents(refund), booking.currency));
        }

        let reason = booking
            .cancellation_reason
            .as_deref()
            .or(booking.decline_reason.as_deref());
        if let Some(reason) = reason {
            body.push_str(&format!("\nReason: {reason}"));
        }

        Self {
            event,
            booking_id: booking.id,
            recipient_email: recipient.email.clone(),
            recipient_name: recipient.display_name().to_string(),
            subject: format!("{} (#{})", event.subject(), booking.id),
            body,
        }
    }
}

/// Sink for booking notifications. Implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: BookingNotification);
}

/// Notifier that holds notifications until they are handed to another one.
///
/// Work running on the blocking pool collects into a buffer and the async
/// caller dispatches it afterwards.
#[derive(Debug, Default)]
pub struct NotificationBuffer {
    pending: Mutex<Vec<BookingNotification>>,
}

impl NotificationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Vec<BookingNotification> {
        self.pending
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Forward every buffered notification to `notifier`.
    pub fn dispatch(self, notifier: &dyn Notifier) {
        for notification in self.into_inner() {
            notifier.notify(notification);
        }
    }
}

impl Notifier for NotificationBuffer {
    fn notify(&self, notification: BookingNotification) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to deliver notification: {0}")]
pub struct DeliveryError(pub String);

/// Transport that performs a single delivery attempt.
pub trait Mailer: Send + Sync {
    fn deliver(&self, notification: &BookingNotification) -> Result<(), DeliveryError>;
}

/// Mailer that writes notifications to the application log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn deliver(&self, notification: &BookingNotification) -> Result<(), DeliveryError> {
        log::info!(
            "Mail to {} <{}>: {}\n{}",
            notification.recipient_name,
            notification.recipient_email,
            notification.subject,
            notification.body
        );
        Ok(())
    }
}
