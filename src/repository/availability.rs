use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::availability::{
        AvailabilityPeriod as DomainAvailabilityPeriod, AvailabilityStatus,
        NewAvailabilityPeriod as DomainNewAvailabilityPeriod, StayRange,
    },
    models::availability::{
        AvailabilityPeriod as DbAvailabilityPeriod,
        NewAvailabilityPeriod as DbNewAvailabilityPeriod,
    },
    repository::{
        AvailabilityReader, AvailabilityWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

/// Periods of `accommodation_id` overlapping the half-open `range`.
pub(crate) fn overlapping_periods(
    conn: &mut SqliteConnection,
    accommodation_id: i32,
    range: StayRange,
    blocking_only: bool,
) -> QueryResult<Vec<DbAvailabilityPeriod>> {
    use crate::schema::availability_periods;

    let mut query = availability_periods::table
        .filter(availability_periods::accommodation_id.eq(accommodation_id))
        .filter(availability_periods::start_date.lt(range.end()))
        .filter(availability_periods::end_date.gt(range.start()))
        .into_boxed::<diesel::sqlite::Sqlite>();

    if blocking_only {
        query =
            query.filter(availability_periods::status.ne(AvailabilityStatus::Available.as_str()));
    }

    query
        .order(availability_periods::start_date.asc())
        .load::<DbAvailabilityPeriod>(conn)
}

impl AvailabilityReader for DieselRepository {
    fn list_availability(
        &self,
        accommodation_id: i32,
        range: StayRange,
    ) -> RepositoryResult<Vec<DomainAvailabilityPeriod>> {
        let mut conn = self.conn()?;
        let rows = overlapping_periods(&mut conn, accommodation_id, range, false)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

impl AvailabilityWriter for DieselRepository {
    fn create_availability_periods(
        &self,
        new_periods: &[DomainNewAvailabilityPeriod],
    ) -> RepositoryResult<usize> {
        use crate::schema::availability_periods;

        if new_periods.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        conn.immediate_transaction::<usize, RepositoryError, _>(|conn| {
            // Blocks may overlap other blocks but never a booked stay.
            for period in new_periods {
                let booked = overlapping_periods(conn, period.accommodation_id, period.range, true)?
                    .into_iter()
                    .find(|existing| existing.status == AvailabilityStatus::Booked.as_str());
                if let Some(booked) = booked {
                    return Err(RepositoryError::Conflict(format!(
                        "dates {} to {} are booked",
                        booked.start_date, booked.end_date
                    )));
                }
            }

            let payload: Vec<DbNewAvailabilityPeriod> =
                new_periods.iter().map(Into::into).collect();

            let inserted = diesel::insert_into(availability_periods::table)
                .values(&payload)
                .execute(conn)?;

            Ok(inserted)
        })
    }
}
