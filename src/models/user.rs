use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insert payload that doubles as the refresh changeset on conflict.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UserMirror<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub email: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<User> for DomainUser {
    fn from(row: User) -> Self {
        Self {
            id: row.id,
            hub_id: row.hub_id,
            name: row.name,
            email: row.email,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for UserMirror<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            hub_id: user.hub_id,
            name: &user.name,
            email: &user.email,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
