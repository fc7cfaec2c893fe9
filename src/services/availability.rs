use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::availability::AvailabilityCheck;
use crate::forms::availability::{BlockDatesForm, UploadAvailabilityForm};
use crate::forms::quotes::AvailabilityQuery;
use crate::repository::{AccommodationReader, AvailabilityReader, AvailabilityWriter, UserReader};
use crate::services::quotes::load_bookable_accommodation;
use crate::services::{ServiceResult, load_hosted_accommodation};

/// Reports whether the range is free and lists every blocking period.
pub fn check_availability<R>(
    repo: &R,
    accommodation_id: i32,
    query: AvailabilityQuery,
) -> ServiceResult<AvailabilityCheck>
where
    R: AccommodationReader + AvailabilityReader + ?Sized,
{
    let range = query.into_range()?;
    let accommodation = load_bookable_accommodation(repo, accommodation_id)?;

    let periods = repo.list_availability(accommodation.id, range)?;
    Ok(AvailabilityCheck::evaluate(accommodation.id, range, &periods))
}

/// Blocks a date range on the host's calendar.
pub fn block_dates<R>(
    repo: &R,
    user: &AuthenticatedUser,
    accommodation_id: i32,
    form: BlockDatesForm,
) -> ServiceResult<usize>
where
    R: AccommodationReader + AvailabilityWriter + UserReader + ?Sized,
{
    let accommodation = load_hosted_accommodation(repo, user, accommodation_id)?;
    let period = form.into_new_period(accommodation.id)?;

    Ok(repo.create_availability_periods(&[period])?)
}

/// Imports blocks from a CSV calendar export.
pub fn import_availability<R>(
    repo: &R,
    user: &AuthenticatedUser,
    accommodation_id: i32,
    mut form: UploadAvailabilityForm,
) -> ServiceResult<usize>
where
    R: AccommodationReader + AvailabilityWriter + UserReader + ?Sized,
{
    let accommodation = load_hosted_accommodation(repo, user, accommodation_id)?;
    let periods = form.into_new_periods(accommodation.id)?;

    Ok(repo.create_availability_periods(&periods)?)
}
