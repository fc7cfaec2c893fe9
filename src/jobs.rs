//! Background work: notification delivery with retries and the stay
//! auto-completion sweep.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use actix_web::rt;
use actix_web::web;
use chrono::Utc;

use crate::notifications::{BookingNotification, Mailer, NotificationBuffer, Notifier};
use crate::repository::DieselRepository;
use crate::services::bookings::complete_finished_stays;

/// How many times a job is attempted and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay before retry `n` is `backoff[min(n - 1, len - 1)]`.
    pub backoff: Vec<Duration>,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Vec<Duration>) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.backoff.is_empty() {
            return Duration::ZERO;
        }
        let index = (attempt.max(1) as usize - 1).min(self.backoff.len() - 1);
        self.backoff[index]
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            5,
            [1, 5, 30, 120].into_iter().map(Duration::from_secs).collect(),
        )
    }
}

/// Run `operation` until it succeeds or the policy gives up, returning the
/// last error in that case.
pub async fn run_with_retry<T, E, F>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    let mut attempt = 1;
    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= policy.max_attempts => return Err(err),
            Err(err) => {
                let delay = policy.delay_for(attempt);
                log::warn!("{label} failed on attempt {attempt}, retrying in {delay:?}: {err}");
                rt::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Notifier that delivers each notification on the actix runtime, retrying
/// failed deliveries according to its policy.
#[derive(Clone)]
pub struct QueuedNotifier {
    mailer: Arc<dyn Mailer>,
    policy: RetryPolicy,
}

impl QueuedNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, policy: RetryPolicy) -> Self {
        Self { mailer, policy }
    }

    /// Deliver `notification`, retrying per policy. Returns whether it was delivered.
    pub async fn deliver(&self, notification: BookingNotification) -> bool {
        let label = format!(
            "Delivery of {} notification for booking {}",
            notification.event, notification.booking_id
        );
        let mailer = Arc::clone(&self.mailer);

        match run_with_retry(&self.policy, &label, || mailer.deliver(&notification)).await {
            Ok(()) => true,
            Err(err) => {
                log::error!("{label} gave up after {} attempts: {err}", self.policy.max_attempts);
                false
            }
        }
    }
}

impl Notifier for QueuedNotifier {
    fn notify(&self, notification: BookingNotification) {
        let queued = self.clone();
        rt::spawn(async move {
            queued.deliver(notification).await;
        });
    }
}

/// Periodically complete confirmed stays whose check-out date has passed.
///
/// The sweep runs on the blocking pool; its notifications are buffered and
/// dispatched once back on the runtime.
pub fn spawn_completion_sweeper(
    repo: DieselRepository,
    notifier: Arc<dyn Notifier>,
    every: Duration,
) {
    rt::spawn(async move {
        let mut interval = rt::time::interval(every);
        loop {
            interval.tick().await;

            let sweep_repo = repo.clone();
            let today = Utc::now().date_naive();
            let result = web::block(move || {
                let buffer = NotificationBuffer::new();
                complete_finished_stays(&sweep_repo, &buffer, today)
                    .map(|completed| (completed, buffer))
            })
            .await;

            match result {
                Ok(Ok((completed, buffer))) => {
                    if completed > 0 {
                        log::info!("Completed {completed} finished stays");
                    }
                    buffer.dispatch(notifier.as_ref());
                }
                Ok(Err(err)) => log::error!("Stay completion sweep failed: {err}"),
                Err(err) => log::error!("Stay completion sweep could not run: {err}"),
            }
        }
    });
}
