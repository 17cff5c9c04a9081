//! Directed follow relationships between users.

use super::user::UserId;

/// A follow request names the same user on both sides.
///
/// Raised before any store write; a self-follow never reaches the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("users cannot follow themselves")]
pub struct InvalidEdge;

/// Validated ordered pair meaning "follower follows followed".
///
/// ## Invariants
/// - `follower != followed`.
///
/// The graph stores at most one edge per ordered pair; inserting an existing
/// pair is a no-op rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FollowEdge {
    follower: UserId,
    followed: UserId,
}

impl FollowEdge {
    /// Validate and construct an edge, rejecting self-follows.
    pub fn new(follower: UserId, followed: UserId) -> Result<Self, InvalidEdge> {
        if follower == followed {
            return Err(InvalidEdge);
        }
        Ok(Self { follower, followed })
    }

    /// The user doing the following.
    pub const fn follower(&self) -> &UserId {
        &self.follower
    }

    /// The user being followed.
    pub const fn followed(&self) -> &UserId {
        &self.followed
    }
}
