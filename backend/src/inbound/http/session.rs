//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting or retrieving the signed-in user
//! id and passing flash notices across redirects.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserId};

use super::flash::Flash;

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const FLASH_KEY: &str = "flash";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop the signed-in user from the session.
    pub fn forget_user(&self) {
        self.0.remove(USER_ID_KEY);
    }

    /// Fetch the signed-in user id from the session, if present.
    ///
    /// A tampered or otherwise malformed value counts as no session.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(value) => match UserId::parse(&value) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Store a flash notice for the next rendered page.
    pub fn push_flash(&self, flash: &Flash) -> Result<(), Error> {
        self.0
            .insert(FLASH_KEY, flash)
            .map_err(|error| Error::internal(format!("failed to persist flash: {error}")))
    }

    /// Consume the pending flash notice, if any.
    pub fn take_flash(&self) -> Result<Option<Flash>, Error> {
        let flash = self
            .0
            .get::<Flash>(FLASH_KEY)
            .map_err(|error| Error::internal(format!("failed to read flash: {error}")))?;
        if flash.is_some() {
            self.0.remove(FLASH_KEY);
        }
        Ok(flash)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::Session;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    use crate::test_support::session_middleware;

    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        let id = UserId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6")
                            .expect("fixture id");
                        session.persist_user(&id)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session
                            .user_id()?
                            .ok_or_else(|| Error::unauthorized("no session"))?;
                        Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[actix_web::test]
    async fn tampered_user_id_resolves_to_no_session() {
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("set invalid user id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        Ok::<_, Error>(
                            HttpResponse::Ok().body(format!("{:?}", session.user_id()?)),
                        )
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(get_res).await;
        assert_eq!(body, "None");
    }

    #[actix_web::test]
    async fn flash_is_consumed_on_read() {
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .route(
                    "/push",
                    web::get().to(|session: SessionContext| async move {
                        session.push_flash(&Flash::notice("Please sign in."))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/take",
                    web::get().to(|session: SessionContext| async move {
                        let flash = session.take_flash()?;
                        Ok::<_, Error>(HttpResponse::Ok().json(flash))
                    }),
                ),
        )
        .await;

        let push_res =
            test::call_service(&app, test::TestRequest::get().uri("/push").to_request()).await;
        let cookie = push_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let take_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let first: Option<Flash> =
            serde_json::from_slice(&test::read_body(take_res).await).expect("flash payload");
        assert_eq!(first, Some(Flash::notice("Please sign in.")));

        // The consuming response rewrites the cookie without the flash.
        let take_again = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let cookie_after = take_again
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session");
        assert!(cookie_after.is_some());
    }
}
