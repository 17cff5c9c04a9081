//! PostgreSQL-backed [`FollowGraph`] implementation using Diesel ORM.
//!
//! Edge uniqueness rides on the composite primary key: a repeated follow is
//! an `ON CONFLICT DO NOTHING` no-op, so idempotency holds under concurrent
//! requests without explicit locking.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};
use tracing::debug;

use crate::domain::ports::{FollowGraph, FollowGraphError};
use crate::domain::{EmailAddress, FollowEdge, User, UserId, UserName};

use super::models::{NewFollowRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{follows, users};

/// Diesel-backed implementation of the [`FollowGraph`] port.
#[derive(Clone)]
pub struct DieselFollowGraph {
    pool: DbPool,
}

impl DieselFollowGraph {
    /// Create a new graph adapter with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FollowGraphError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            FollowGraphError::connection(message)
        }
    }
}

fn map_diesel_error(error: DieselError) -> FollowGraphError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            FollowGraphError::UnknownUser
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            FollowGraphError::connection("database connection error")
        }
        _ => FollowGraphError::query("database error"),
    }
}

fn row_to_user(row: UserRow) -> Result<User, FollowGraphError> {
    let name = UserName::new(row.name)
        .map_err(|error| FollowGraphError::query(format!("stored name invalid: {error}")))?;
    let email = EmailAddress::new(row.email)
        .map_err(|error| FollowGraphError::query(format!("stored email invalid: {error}")))?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        name,
        email,
        admin: row.admin,
        created_at: row.created_at,
    })
}

fn to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[async_trait]
impl FollowGraph for DieselFollowGraph {
    async fn follow(&self, edge: &FollowEdge) -> Result<(), FollowGraphError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewFollowRow {
            follower_id: *edge.follower().as_uuid(),
            followed_id: *edge.followed().as_uuid(),
        };
        diesel::insert_into(follows::table)
            .values(&row)
            .on_conflict((follows::follower_id, follows::followed_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn unfollow(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<(), FollowGraphError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(
            follows::table.filter(
                follows::follower_id
                    .eq(*follower.as_uuid())
                    .and(follows::followed_id.eq(*followed.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn is_following(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, FollowGraphError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            follows::table.filter(
                follows::follower_id
                    .eq(*follower.as_uuid())
                    .and(follows::followed_id.eq(*followed.as_uuid())),
            ),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn followers(
        &self,
        user: &UserId,
        window: PageRequest,
    ) -> Result<Page<User>, FollowGraphError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = follows::table
            .filter(follows::followed_id.eq(*user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = follows::table
            .inner_join(users::table.on(users::id.eq(follows::follower_id)))
            .filter(follows::followed_id.eq(*user.as_uuid()))
            .order((follows::created_at.desc(), users::id.asc()))
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

    async fn following(
        &self,
        user: &UserId,
        window: PageRequest,
    ) -> Result<Page<User>, FollowGraphError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = follows::table
            .filter(follows::follower_id.eq(*user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = follows::table
            .inner_join(users::table.on(users::id.eq(follows::followed_id)))
            .filter(follows::follower_id.eq(*user.as_uuid()))
            .order((follows::created_at.desc(), users::id.asc()))
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

    async fn followers_count(&self, user: &UserId) -> Result<u64, FollowGraphError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = follows::table
            .filter(follows::followed_id.eq(*user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_total(total))
    }

    async fn following_count(&self, user: &UserId) -> Result<u64, FollowGraphError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = follows::table
            .filter(follows::follower_id.eq(*user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_total(total))
    }
}

#[cfg(test)]
mod tests {
    //! Error-mapping coverage; graph behaviour is exercised against the
    //! in-memory port double and in integration tests.
    use super::*;

    #[test]
    fn pool_failures_map_to_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(error, FollowGraphError::Connection { .. }));
    }

    #[test]
    fn unexpected_diesel_errors_map_to_query_errors() {
        let error = map_diesel_error(DieselError::NotFound);
        assert!(matches!(error, FollowGraphError::Query { .. }));
    }
}
