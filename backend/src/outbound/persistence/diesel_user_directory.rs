//! PostgreSQL-backed [`UserDirectory`] implementation using Diesel ORM.
//!
//! A thin adapter: it translates between Diesel rows and domain types and
//! delegates atomicity to PostgreSQL. Destroying a user runs the cascade
//! (posts, edges in both directions, the user row) in a single transaction
//! so partial application cannot be observed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::{Page, PageRequest};
use tracing::debug;

use crate::domain::ports::{DirectoryError, UserDirectory};
use crate::domain::{
    EmailAddress, NewUser, PasswordDigest, Post, PostId, User, UserChanges, UserId, UserName,
};

use super::models::{NewUserRow, PostRow, UserChangesRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{follows, posts, users};

/// Diesel-backed implementation of the [`UserDirectory`] port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory adapter with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DirectoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DirectoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: DieselError) -> DirectoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => DirectoryError::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info
                .constraint_name()
                .is_some_and(|name| name.contains("email")) =>
        {
            DirectoryError::EmailTaken
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DirectoryError::connection("database connection error")
        }
        _ => DirectoryError::query("database error"),
    }
}

/// Convert a database row to a domain user.
///
/// Stored rows were validated on the way in; a row that no longer passes
/// validation indicates out-of-band writes and surfaces as a query error.
fn row_to_user(row: UserRow) -> Result<User, DirectoryError> {
    let name = UserName::new(row.name)
        .map_err(|error| DirectoryError::query(format!("stored name invalid: {error}")))?;
    let email = EmailAddress::new(row.email)
        .map_err(|error| DirectoryError::query(format!("stored email invalid: {error}")))?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        name,
        email,
        admin: row.admin,
        created_at: row.created_at,
    })
}

fn row_to_post(row: PostRow) -> Post {
    Post {
        id: PostId::from_uuid(row.id),
        author_id: UserId::from_uuid(row.author_id),
        content: row.content,
        created_at: row.created_at,
    }
}

fn to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn list(&self, window: PageRequest) -> Result<Page<User>, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .offset(window.offset())
            .limit(window.limit())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, window, to_total(total)))
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Option<User>, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        if !PasswordDigest::from_phc(row.password_digest.clone()).verify(password) {
            return Ok(None);
        }
        row_to_user(row).map(Some)
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *new_user.id.as_uuid(),
            name: new_user.name.as_str(),
            email: new_user.email.as_str(),
            password_digest: new_user.digest.as_str(),
            admin: false,
        };
        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(inserted)
    }

    async fn update(&self, id: &UserId, changes: &UserChanges) -> Result<User, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = UserChangesRow {
            name: changes.name.as_str(),
            email: changes.email.as_str(),
            password_digest: changes.digest.as_ref().map(PasswordDigest::as_str),
        };
        let updated: UserRow = diesel::update(users::table.find(*id.as_uuid()))
            .set(&row)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(updated)
    }

    async fn destroy(&self, id: &UserId) -> Result<(), DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *id.as_uuid();
        conn.transaction::<(), DieselError, _>(|conn| {
            async move {
                diesel::delete(posts::table.filter(posts::author_id.eq(user_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    follows::table.filter(
                        follows::follower_id
                            .eq(user_id)
                            .or(follows::followed_id.eq(user_id)),
                    ),
                )
                .execute(conn)
                .await?;
                let deleted = diesel::delete(users::table.find(user_id))
                    .execute(conn)
                    .await?;
                if deleted == 0 {
                    return Err(DieselError::NotFound);
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn posts(
        &self,
        author: &UserId,
        window: PageRequest,
    ) -> Result<Page<Post>, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = posts::table
            .filter(posts::author_id.eq(*author.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<PostRow> = posts::table
            .filter(posts::author_id.eq(*author.as_uuid()))
            .order((posts::created_at.desc(), posts::id.asc()))
            .offset(window.offset())
            .limit(window.limit())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows.into_iter().map(row_to_post).collect();
        Ok(Page::new(items, window, to_total(total)))
    }

    async fn post_count(&self, author: &UserId) -> Result<u64, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = posts::table
            .filter(posts::author_id.eq(*author.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_total(total))
    }
}
