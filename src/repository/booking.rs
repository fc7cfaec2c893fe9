use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::{
    domain::availability::{AvailabilityStatus, NewAvailabilityPeriod},
    domain::booking::{
        Booking as DomainBooking, BookingListQuery, BookingScope, BookingStatus, BookingTransition,
        NewBooking as DomainNewBooking, PaymentStatus, ReservationChange,
    },
    models::availability::NewAvailabilityPeriod as DbNewAvailabilityPeriod,
    models::booking::{Booking as DbBooking, BookingStatusChange, NewBooking as DbNewBooking},
    repository::{
        BookingReader, BookingWriter, DieselRepository, page_window,
        availability::overlapping_periods,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{accommodations, availability_periods, bookings},
};

fn filtered_bookings(query: &BookingListQuery) -> bookings::BoxedQuery<'static, Sqlite> {
    let mut items = bookings::table.into_boxed::<Sqlite>();

    match query.scope {
        BookingScope::Host(host_id) => {
            items = items.filter(
                bookings::accommodation_id.eq_any(
                    accommodations::table
                        .filter(accommodations::host_id.eq(host_id))
                        .select(accommodations::id),
                ),
            );
        }
        BookingScope::Guest(guest_id) => {
            items = items.filter(bookings::guest_id.eq(guest_id));
        }
        BookingScope::All => {}
    }

    if let Some(accommodation_id) = query.accommodation_id {
        items = items.filter(bookings::accommodation_id.eq(accommodation_id));
    }

    if let Some(status) = query.status {
        items = items.filter(bookings::status.eq(status.as_str()));
    }

    if let Some(date) = query.check_out_on_or_before {
        items = items.filter(bookings::check_out.le(date));
    }

    items
}

/// Insert a `booked` period for `booking_id` after checking the range is free.
fn reserve(
    conn: &mut SqliteConnection,
    booking_id: i32,
    reservation: &NewAvailabilityPeriod,
) -> RepositoryResult<()> {
    let conflicts =
        overlapping_periods(conn, reservation.accommodation_id, reservation.range, true)?;
    if let Some(conflict) = conflicts.first() {
        return Err(RepositoryError::Conflict(format!(
            "dates {} to {} are already {}",
            conflict.start_date, conflict.end_date, conflict.status
        )));
    }

    let reservation = reservation.clone().with_booking_id(booking_id);
    diesel::insert_into(availability_periods::table)
        .values(&DbNewAvailabilityPeriod::from(&reservation))
        .execute(conn)?;

    Ok(())
}

fn load_booking(conn: &mut SqliteConnection, booking_id: i32) -> RepositoryResult<DomainBooking> {
    bookings::table
        .filter(bookings::id.eq(booking_id))
        .first::<DbBooking>(conn)?
        .try_into()
}

impl BookingReader for DieselRepository {
    fn get_booking_by_id(&self, id: i32) -> RepositoryResult<Option<DomainBooking>> {
        let mut conn = self.conn()?;
        let booking = bookings::table
            .filter(bookings::id.eq(id))
            .first::<DbBooking>(&mut conn)
            .optional()?;

        booking.map(TryInto::try_into).transpose()
    }

    fn list_bookings(
        &self,
        query: BookingListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainBooking>)> {
        let mut conn = self.conn()?;

        let total = filtered_bookings(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items =
            filtered_bookings(&query).order((bookings::check_in.asc(), bookings::id.asc()));

        if let Some(pagination) = &query.pagination {
            match page_window(pagination) {
                Some((offset, limit)) => items = items.offset(offset).limit(limit),
                None => return Ok((total, Vec::new())),
            }
        }

        let rows = items.load::<DbBooking>(&mut conn)?;
        let bookings = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<RepositoryResult<Vec<DomainBooking>>>()?;

        Ok((total, bookings))
    }
}

impl BookingWriter for DieselRepository {
    fn create_booking(&self, new_booking: &DomainNewBooking) -> RepositoryResult<DomainBooking> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<DomainBooking, RepositoryError, _>(|conn| {
            let db_new = DbNewBooking::try_from(new_booking)?;
            let created = diesel::insert_into(bookings::table)
                .values(&db_new)
                .get_result::<DbBooking>(conn)?;

            if new_booking.status == BookingStatus::Confirmed {
                let reservation = NewAvailabilityPeriod::reservation(
                    new_booking.accommodation_id,
                    new_booking.stay,
                );
                reserve(conn, created.id, &reservation)?;
            }

            created.try_into()
        })
    }

    fn apply_booking_transition(
        &self,
        booking_id: i32,
        transition: &BookingTransition,
    ) -> RepositoryResult<DomainBooking> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<DomainBooking, RepositoryError, _>(|conn| {
            let sources: Vec<&str> = transition
                .action
                .sources()
                .iter()
                .map(|status| status.as_str())
                .collect();

            let change = BookingStatusChange::from(transition);
            let updated = diesel::update(
                bookings::table
                    .filter(bookings::id.eq(booking_id))
                    .filter(bookings::status.eq_any(sources)),
            )
            .set(&change)
            .execute(conn)?;

            if updated == 0 {
                let current = bookings::table
                    .filter(bookings::id.eq(booking_id))
                    .select(bookings::status)
                    .first::<String>(conn)
                    .optional()?;

                return match current {
                    Some(status) => Err(RepositoryError::Conflict(format!(
                        "cannot {} a booking that is {status}",
                        transition.action
                    ))),
                    None => Err(RepositoryError::not_found()),
                };
            }

            match &transition.reservation {
                ReservationChange::None => {}
                ReservationChange::Reserve(reservation) => reserve(conn, booking_id, reservation)?,
                ReservationChange::Release => {
                    diesel::delete(
                        availability_periods::table
                            .filter(availability_periods::booking_id.eq(booking_id))
                            .filter(
                                availability_periods::status
                                    .eq(AvailabilityStatus::Booked.as_str()),
                            ),
                    )
                    .execute(conn)?;
                }
            }

            load_booking(conn, booking_id)
        })
    }

    fn update_payment_status(
        &self,
        booking_id: i32,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> RepositoryResult<DomainBooking> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainBooking, RepositoryError, _>(|conn| {
            let updated = diesel::update(
                bookings::table
                    .filter(bookings::id.eq(booking_id))
                    .filter(bookings::payment_status.eq(from.as_str())),
            )
            .set((
                bookings::payment_status.eq(to.as_str()),
                bookings::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)?;

            if updated == 0 {
                let exists = bookings::table
                    .filter(bookings::id.eq(booking_id))
                    .count()
                    .get_result::<i64>(conn)?;
                if exists == 0 {
                    return Err(RepositoryError::not_found());
                }
                return Err(RepositoryError::Conflict(format!(
                    "payment status is no longer {}",
                    from.as_str()
                )));
            }

            load_booking(conn, booking_id)
        })
    }
}
