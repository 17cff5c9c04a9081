//! Test-only helpers: in-memory port implementations and session plumbing.
//!
//! Compiled behind the `test-support` feature so unit and integration tests
//! can exercise the full HTTP surface without a database.

mod memory;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use serde_json::json;

pub use memory::InMemoryStore;

use crate::inbound::http;

/// Cookie session middleware with an ephemeral key, for tests.
pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .cookie_http_only(true)
        .build()
}

/// Assemble the full application around the given store's ports.
pub fn test_app(
    store: &InMemoryStore,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(store.http_state()))
        .wrap(session_middleware())
        .configure(http::configure)
}

/// Sign in through the API and return the resulting session cookie.
///
/// # Panics
/// Panics when the credentials are rejected; fixtures supply valid ones.
pub async fn signin_cookie<S, B>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/signin")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(
        response.status().is_redirection(),
        "sign-in should redirect, got {}",
        response.status()
    );
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
