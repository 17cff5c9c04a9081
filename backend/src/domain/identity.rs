//! The resolved identity behind a request.
//!
//! Session state is process-external; every request resolves it into an
//! explicit [`Identity`] value that is passed into the authorization policy
//! as a parameter. Nothing in the domain reads ambient session state.

use super::user::{User, UserId};

/// The current requester: a known user or nobody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No session, or a session naming a user that no longer exists.
    Anonymous,
    /// A signed-in user.
    Authenticated {
        /// The signed-in user's id.
        id: UserId,
        /// Whether that user holds the admin flag.
        admin: bool,
    },
}

impl Identity {
    /// Identity of a resolved user record.
    pub const fn of(user: &User) -> Self {
        Self::Authenticated {
            id: user.id,
            admin: user.admin,
        }
    }

    /// Whether no user is signed in.
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// The signed-in user's id, if any.
    pub const fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { id, .. } => Some(id),
        }
    }

    /// Whether the signed-in user holds the admin flag.
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Authenticated { admin: true, .. })
    }
}
