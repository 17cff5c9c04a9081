//! Sign-in and sign-out handlers.
//!
//! The sign-in page is also the redirect target for unauthenticated denials,
//! so its shell consumes and returns any pending flash notice.

use actix_web::{delete, get, post, web, HttpResponse};

use crate::domain::{ApiResult, EmailAddress, Error};

use super::access::{see_other, see_profile, ROOT_PATH};
use super::dto::{PageShell, SigninRequest};
use super::error::map_directory_error;
use super::session::SessionContext;
use super::state::HttpState;

/// Sign-in form shell; the unauthenticated-denial redirect target.
#[utoipa::path(
    get,
    path = "/signin",
    responses((status = 200, description = "Sign-in shell with any pending notice", body = PageShell)),
    tags = ["sessions"],
    operation_id = "signinForm"
)]
#[get("/signin")]
pub async fn signin_form(session: SessionContext) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(PageShell {
        flash: session.take_flash()?,
    }))
}

/// Authenticate and establish a session.
///
/// A malformed email, an unknown email, and a wrong password are
/// indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/signin",
    request_body = SigninRequest,
    responses(
        (status = 303, description = "Signed in; redirect to the profile"),
        (status = 401, description = "Invalid email/password combination", body = Error)
    ),
    tags = ["sessions"],
    operation_id = "signin"
)]
#[post("/signin")]
pub async fn signin(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<SigninRequest>,
) -> ApiResult<HttpResponse> {
    let rejected = || Error::unauthorized("invalid email/password combination");
    let email = EmailAddress::new(payload.email.clone()).map_err(|_| rejected())?;
    let user = state
        .directory
        .authenticate(&email, &payload.password)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(rejected)?;
    session.persist_user(&user.id)?;
    Ok(see_profile(&user.id))
}

/// Drop the session and return to the root.
#[utoipa::path(
    delete,
    path = "/signout",
    responses((status = 303, description = "Signed out; redirect to root")),
    tags = ["sessions"],
    operation_id = "signout"
)]
#[delete("/signout")]
pub async fn signout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.forget_user();
    Ok(see_other(ROOT_PATH))
}

#[cfg(test)]
mod tests {
    //! Handler coverage over in-memory ports.
    use actix_web::http::{header, StatusCode};
    use actix_web::test as actix_test;

    use crate::test_support::{signin_cookie, test_app, InMemoryStore};

    #[actix_web::test]
    async fn signin_with_valid_credentials_redirects_to_the_profile() {
        let store = InMemoryStore::new();
        let user = store.seed_user("Example User", "user@example.com", "password", false);
        let app = actix_test::init_service(test_app(&store)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/signin")
                .set_json(serde_json::json!({
                    "email": "user@example.com",
                    "password": "password"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some(format!("/users/{}", user.id).as_str())
        );
    }

    #[actix_web::test]
    async fn signin_with_wrong_password_is_unauthorised_and_sets_no_session() {
        let store = InMemoryStore::new();
        let user = store.seed_user("Example User", "user@example.com", "password", false);
        let app = actix_test::init_service(test_app(&store)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/signin")
                .set_json(serde_json::json!({
                    "email": "user@example.com",
                    "password": "wrong-password"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // No usable session was established; the profile still denies access.
        let profile = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/users/{}", user.id))
                .to_request(),
        )
        .await;
        assert_eq!(profile.status(), StatusCode::SEE_OTHER);
    }

    #[actix_web::test]
    async fn signout_drops_the_session() {
        let store = InMemoryStore::new();
        let user = store.seed_user("Example User", "user@example.com", "password", false);
        let app = actix_test::init_service(test_app(&store)).await;
        let cookie = signin_cookie(&app, "user@example.com", "password").await;

        let signout = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/signout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(signout.status(), StatusCode::SEE_OTHER);
        let cleared = signout
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("rewritten session cookie")
            .into_owned();

        let profile = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/users/{}", user.id))
                .cookie(cleared)
                .to_request(),
        )
        .await;
        assert_eq!(profile.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            profile
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/signin")
        );
    }
}
