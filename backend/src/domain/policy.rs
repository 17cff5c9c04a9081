//! Access-control policy for user directory and follow graph actions.
//!
//! [`decide`] is a pure function of the requesting identity, the action, and
//! the target user. Handlers consult it before touching any port; a denied
//! request never reaches the directory or the graph.

use super::identity::Identity;
use super::user::UserId;

/// An action a request wants to perform against a target user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Browse the paginated user listing.
    ViewList,
    /// View a user's profile, posts, and stats.
    ViewProfile,
    /// Fetch the registration form scaffold.
    New,
    /// Register a new account.
    Create,
    /// Fetch the profile-edit form scaffold.
    EditOwn,
    /// Apply profile changes.
    UpdateOwn,
    /// Destroy a user account.
    Destroy,
    /// View who a user follows.
    ViewFollowing,
    /// View a user's followers.
    ViewFollowers,
    /// Start following the target user.
    Follow,
    /// Stop following the target user.
    Unfollow,
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The action may proceed.
    Allow,
    /// Nobody is signed in; route the requester to sign-in.
    DenyUnauthenticated,
    /// Signed in, but lacking rights; route the requester to the root.
    DenyForbidden,
}

/// Decide whether `identity` may perform `action` against `target`.
///
/// Registration (`New`/`Create`) is open to everyone. Everything else
/// requires a signed-in identity; on top of that, profile edits are
/// owner-only and destruction is admin-only. Follow-list viewing and
/// follow/unfollow require authentication alone, so any signed-in user may
/// see any user's lists.
pub fn decide(identity: &Identity, action: Action, target: &UserId) -> Decision {
    match action {
        Action::New | Action::Create => Decision::Allow,
        Action::ViewList
        | Action::ViewProfile
        | Action::ViewFollowing
        | Action::ViewFollowers
        | Action::Follow
        | Action::Unfollow => {
            if identity.is_anonymous() {
                Decision::DenyUnauthenticated
            } else {
                Decision::Allow
            }
        }
        Action::EditOwn | Action::UpdateOwn => match identity.user_id() {
            None => Decision::DenyUnauthenticated,
            Some(id) if id == target => Decision::Allow,
            Some(_) => Decision::DenyForbidden,
        },
        Action::Destroy => {
            if identity.is_anonymous() {
                Decision::DenyUnauthenticated
            } else if identity.is_admin() {
                Decision::Allow
            } else {
                Decision::DenyForbidden
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn user(id: UserId) -> Identity {
        Identity::Authenticated { id, admin: false }
    }

    fn admin(id: UserId) -> Identity {
        Identity::Authenticated { id, admin: true }
    }

    #[rstest]
    #[case(Action::ViewList)]
    #[case(Action::ViewProfile)]
    #[case(Action::EditOwn)]
    #[case(Action::UpdateOwn)]
    #[case(Action::ViewFollowing)]
    #[case(Action::ViewFollowers)]
    #[case(Action::Follow)]
    #[case(Action::Unfollow)]
    #[case(Action::Destroy)]
    fn anonymous_requests_are_routed_to_sign_in(#[case] action: Action) {
        let target = UserId::random();
        assert_eq!(
            decide(&Identity::Anonymous, action, &target),
            Decision::DenyUnauthenticated
        );
    }

    #[rstest]
    #[case(Action::New)]
    #[case(Action::Create)]
    fn registration_is_open_to_everyone(#[case] action: Action) {
        let target = UserId::random();
        assert_eq!(
            decide(&Identity::Anonymous, action, &target),
            Decision::Allow
        );
        assert_eq!(
            decide(&user(UserId::random()), action, &target),
            Decision::Allow
        );
    }

    #[rstest]
    #[case(Action::EditOwn)]
    #[case(Action::UpdateOwn)]
    fn profile_edits_are_owner_only(#[case] action: Action) {
        let owner = UserId::random();
        let other = UserId::random();
        assert_eq!(decide(&user(owner), action, &owner), Decision::Allow);
        assert_eq!(
            decide(&user(other), action, &owner),
            Decision::DenyForbidden
        );
    }

    #[test]
    fn admins_may_not_edit_other_profiles() {
        let target = UserId::random();
        assert_eq!(
            decide(&admin(UserId::random()), Action::UpdateOwn, &target),
            Decision::DenyForbidden
        );
    }

    #[test]
    fn destruction_is_admin_only() {
        let target = UserId::random();
        assert_eq!(
            decide(&user(UserId::random()), Action::Destroy, &target),
            Decision::DenyForbidden
        );
        assert_eq!(
            decide(&admin(UserId::random()), Action::Destroy, &target),
            Decision::Allow
        );
    }

    #[rstest]
    #[case(Action::ViewList)]
    #[case(Action::ViewProfile)]
    #[case(Action::ViewFollowing)]
    #[case(Action::ViewFollowers)]
    fn signed_in_users_may_view_any_directory_page(#[case] action: Action) {
        let target = UserId::random();
        assert_eq!(
            decide(&user(UserId::random()), action, &target),
            Decision::Allow
        );
    }
}
