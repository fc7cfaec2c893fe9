use diesel::prelude::*;

use crate::{
    domain::user::{NewUser as DomainNewUser, User as DomainUser, normalize_email},
    models::user::{User as DbUser, UserMirror},
    repository::{DieselRepository, UserReader, UserWriter, errors::RepositoryResult},
    schema::users,
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<DomainUser>> {
        let mut conn = self.conn()?;
        let row = users::table
            .find(id)
            .select(DbUser::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(DomainUser::from))
    }

    fn get_user_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<DomainUser>> {
        let mut conn = self.conn()?;
        let row = users::table
            .filter(users::hub_id.eq(hub_id))
            .filter(users::email.eq(normalize_email(email)))
            .select(DbUser::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(DomainUser::from))
    }
}

impl UserWriter for DieselRepository {
    fn upsert_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        let mut conn = self.conn()?;
        let mirror = UserMirror::from(new_user);

        // Hub and email are the conflict target, so the update only
        // refreshes the name.
        let row = diesel::insert_into(users::table)
            .values(&mirror)
            .on_conflict((users::hub_id, users::email))
            .do_update()
            .set(&mirror)
            .returning(DbUser::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }
}
