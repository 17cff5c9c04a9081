//! Posts authored by users.
//!
//! This service only lists and counts posts for profile display and removes
//! them when their author is destroyed; authoring itself lives elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Wrap an already-parsed UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A post as shown on its author's profile.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Stable identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: PostId,
    /// The authoring user.
    #[schema(value_type = String, format = Uuid)]
    pub author_id: UserId,
    /// Post body.
    pub content: String,
    /// Authoring timestamp; profile feeds order by this, newest first.
    pub created_at: DateTime<Utc>,
}
