use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

pub use errors::{ServiceError, ServiceResult};

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::accommodation::Accommodation;
use crate::domain::user::NewUser;
use crate::repository::{AccommodationReader, UserReader, UserWriter};

pub mod accommodations;
pub mod availability;
pub mod bookings;
pub mod errors;
pub mod quotes;

#[cfg(test)]
pub(crate) mod fake;

/// The signed-in user resolved against the local user mirror.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Caller<'a> {
    pub user: &'a AuthenticatedUser,
    /// Local user id, `None` until the user has hosted or booked anything.
    pub id: Option<i32>,
}

impl<'a> Caller<'a> {
    /// Look the signed-in user up without writing anything.
    pub fn resolve<R>(repo: &R, user: &'a AuthenticatedUser) -> ServiceResult<Self>
    where
        R: UserReader + ?Sized,
    {
        require_identity(user)?;
        let id = repo
            .get_user_by_email(&user.email, user.hub_id)?
            .map(|stored| stored.id);
        Ok(Self { user, id })
    }

    /// Refresh the local mirror from the session claims, creating it on
    /// first use.
    pub fn mirror<R>(repo: &R, user: &'a AuthenticatedUser) -> ServiceResult<Self>
    where
        R: UserWriter + ?Sized,
    {
        require_identity(user)?;
        let stored = repo.upsert_user(&NewUser::from(user))?;
        Ok(Self {
            user,
            id: Some(stored.id),
        })
    }

    pub fn is_admin(&self) -> bool {
        check_role(SERVICE_ACCESS_ROLE, &self.user.roles)
    }

    pub fn is(&self, user_id: i32) -> bool {
        self.id == Some(user_id)
    }

    /// Whether the caller may act as host of `accommodation`: its owner, or
    /// an admin of the hub it belongs to.
    pub fn can_host(&self, accommodation: &Accommodation) -> bool {
        self.id.is_some_and(|id| accommodation.is_hosted_by(id))
            || (self.is_admin() && accommodation.hub_id == self.user.hub_id)
    }
}

/// Sessions without an email cannot be mapped to a local user.
fn require_identity(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.email.trim().is_empty() {
        return Err(ServiceError::unauthorized());
    }
    Ok(())
}

/// Load an accommodation the signed-in user hosts.
pub(crate) fn load_hosted_accommodation<R>(
    repo: &R,
    user: &AuthenticatedUser,
    accommodation_id: i32,
) -> ServiceResult<Accommodation>
where
    R: AccommodationReader + UserReader + ?Sized,
{
    let caller = Caller::resolve(repo, user)?;

    let accommodation = repo
        .get_accommodation_by_id(accommodation_id)?
        .ok_or_else(ServiceError::not_found)?;

    if !caller.can_host(&accommodation) {
        return Err(ServiceError::Forbidden);
    }

    Ok(accommodation)
}
