//! Diesel row structs used by the persistence adapters.
//!
//! Internal implementation details of this module tree; domain types never
//! see them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{follows, posts, users};

/// Queryable row for user accounts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable row for a new user account.
///
/// `created_at` is filled by the database default; `admin` is always false
/// for registrations.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_digest: &'a str,
    pub admin: bool,
}

/// Changeset for a profile edit; a `None` digest keeps the stored one.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangesRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_digest: Option<&'a str>,
}

/// Queryable row for posts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable row for a follow edge; `created_at` is filled by the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct NewFollowRow {
    pub follower_id: Uuid,
    pub followed_id: Uuid,
}
