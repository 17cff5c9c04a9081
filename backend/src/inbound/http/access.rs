//! Turns policy decisions into responses.
//!
//! Denials become redirects: an unauthenticated requester is sent to the
//! sign-in page with a "Please sign in." notice, a forbidden one to the
//! application root with no further state change. A denied request never
//! reaches a port.

use actix_web::{http::header, HttpResponse};
use uuid::Uuid;

use crate::domain::{decide, Action, ApiResult, Decision, Identity, UserId};

use super::flash::Flash;
use super::session::SessionContext;

/// Sign-in page; the redirect target for unauthenticated denials.
pub const SIGNIN_PATH: &str = "/signin";

/// Application root; the redirect target for forbidden denials.
pub const ROOT_PATH: &str = "/";

/// User listing; the redirect target after a destroy.
pub const USERS_PATH: &str = "/users";

/// Placeholder target for actions that do not reference a user.
///
/// The policy ignores the target for `ViewList`, `New`, and `Create`;
/// handlers for those routes pass this nil id.
pub(crate) fn no_target() -> UserId {
    UserId::from_uuid(Uuid::nil())
}

/// Build a `303 See Other` redirect to `location`.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect to a user's profile page.
pub fn see_profile(id: &UserId) -> HttpResponse {
    see_other(&format!("{USERS_PATH}/{id}"))
}

/// Consult the policy; a denial yields the ready-made redirect response.
///
/// Returns `Ok(None)` on [`Decision::Allow`], so handlers read as
/// "if denied, return the redirect; otherwise execute".
pub fn deny(
    identity: &Identity,
    action: Action,
    target: &UserId,
    session: &SessionContext,
) -> ApiResult<Option<HttpResponse>> {
    match decide(identity, action, target) {
        Decision::Allow => Ok(None),
        Decision::DenyUnauthenticated => {
            session.push_flash(&Flash::notice("Please sign in."))?;
            Ok(Some(see_other(SIGNIN_PATH)))
        }
        Decision::DenyForbidden => Ok(Some(see_other(ROOT_PATH))),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn see_other_sets_location() {
        let response = see_other(SIGNIN_PATH);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some(SIGNIN_PATH)
        );
    }

    #[test]
    fn profile_redirects_embed_the_user_id() {
        let id = UserId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id");
        let response = see_profile(&id);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/users/3fa85f64-5717-4562-b3fc-2c963f66afa6")
        );
    }
}
