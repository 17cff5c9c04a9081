//! Port abstraction for the directed follow graph and its errors.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::follow::FollowEdge;
use crate::domain::user::{User, UserId};

/// Persistence errors raised by follow graph adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FollowGraphError {
    /// Store connection could not be established.
    #[error("follow graph connection failed: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("follow graph query failed: {message}")]
    Query {
        /// Underlying failure description.
        message: String,
    },
    /// An edge endpoint names a user that does not exist.
    #[error("follow edge references an unknown user")]
    UnknownUser,
}

impl FollowGraphError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Directed follow edges between users, with paginated listings.
///
/// Listings are ordered by edge `created_at` descending (most recent
/// relationship first), tie-broken by the related user's id ascending so the
/// order stays deterministic when edges share a timestamp.
#[async_trait]
pub trait FollowGraph: Send + Sync {
    /// Insert the edge if absent; inserting an existing edge is a no-op.
    ///
    /// Self-follows are unrepresentable: [`FollowEdge`] rejects them before
    /// this port is reached.
    async fn follow(&self, edge: &FollowEdge) -> Result<(), FollowGraphError>;

    /// Remove the edge if present; removing a missing edge is a no-op.
    async fn unfollow(&self, follower: &UserId, followed: &UserId)
        -> Result<(), FollowGraphError>;

    /// Whether an edge from `follower` to `followed` exists.
    async fn is_following(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, FollowGraphError>;

    /// One window of the users following `user`, plus the total count.
    async fn followers(
        &self,
        user: &UserId,
        window: PageRequest,
    ) -> Result<Page<User>, FollowGraphError>;

    /// One window of the users `user` follows, plus the total count.
    async fn following(
        &self,
        user: &UserId,
        window: PageRequest,
    ) -> Result<Page<User>, FollowGraphError>;

    /// Total number of followers, independent of pagination.
    async fn followers_count(&self, user: &UserId) -> Result<u64, FollowGraphError>;

    /// Total number of users followed, independent of pagination.
    async fn following_count(&self, user: &UserId) -> Result<u64, FollowGraphError>;
}
