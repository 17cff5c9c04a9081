//! HTTP inbound adapter exposing the users, sessions, and follow graph
//! endpoints.

pub mod access;
pub mod dto;
pub mod error;
pub mod flash;
pub mod health;
pub mod home;
pub mod identity;
pub mod relationships;
pub mod session;
pub mod sessions;
pub mod state;
pub mod users;

use actix_web::web;

/// Register every route on the application.
///
/// The caller supplies session middleware and an
/// [`HttpState`](state::HttpState) via `app_data`; health probes also expect
/// a [`HealthState`](health::HealthState).
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home::home)
        .service(sessions::signin_form)
        .service(sessions::signin)
        .service(sessions::signout)
        // Register the static segment before the `{id}` routes so
        // `/users/new` never parses as a profile lookup.
        .service(users::new_form)
        .service(users::index)
        .service(users::create)
        .service(users::edit_form)
        .service(relationships::following)
        .service(relationships::followers)
        .service(relationships::follow)
        .service(relationships::unfollow)
        .service(users::show)
        .service(users::update)
        .service(users::destroy);
}
