//! Port abstraction for the user directory and its errors.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::post::Post;
use crate::domain::registration::{NewUser, UserChanges};
use crate::domain::user::{EmailAddress, User, UserId};

/// Persistence errors raised by directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// Store connection could not be established.
    #[error("user directory connection failed: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user directory query failed: {message}")]
    Query {
        /// Underlying failure description.
        message: String,
    },
    /// Another record already holds the email address.
    #[error("email address has already been taken")]
    EmailTaken,
    /// The referenced user does not exist.
    #[error("user record not found")]
    NotFound,
}

impl DirectoryError {
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

/// Paginated listing, lookup, and lifecycle of user records.
///
/// Listings are ordered by user id ascending, a stable and deterministic
/// order, so page windows never overlap or skip. Profile feeds are ordered
/// by post `created_at` descending, newest first.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// One window of all users, ordered by id ascending, plus the total count.
    async fn list(&self, window: PageRequest) -> Result<Page<User>, DirectoryError>;

    /// Fetch a user by identifier.
    async fn get(&self, id: &UserId) -> Result<Option<User>, DirectoryError>;

    /// Verify a credential pair, returning the matching user on success.
    ///
    /// A missing user and a wrong password are indistinguishable to callers.
    async fn authenticate(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Option<User>, DirectoryError>;

    /// Insert a validated new user record.
    ///
    /// Fails with [`DirectoryError::EmailTaken`] when the email is already
    /// held; insertion and the uniqueness check are one atomic operation.
    async fn create(&self, new_user: &NewUser) -> Result<User, DirectoryError>;

    /// Apply validated changes to a stored record.
    ///
    /// Fails with [`DirectoryError::NotFound`] when the user does not exist
    /// and [`DirectoryError::EmailTaken`] when the new email is already held.
    /// On failure the stored record is unchanged.
    async fn update(&self, id: &UserId, changes: &UserChanges) -> Result<User, DirectoryError>;

    /// Remove a user, cascading to their posts and to follow edges in both
    /// directions, all within a single transaction.
    async fn destroy(&self, id: &UserId) -> Result<(), DirectoryError>;

    /// One window of the user's posts, newest first, plus the total count.
    async fn posts(&self, author: &UserId, window: PageRequest)
        -> Result<Page<Post>, DirectoryError>;

    /// Total number of posts the user authored, independent of pagination.
    async fn post_count(&self, author: &UserId) -> Result<u64, DirectoryError>;
}
