//! OpenAPI documentation aggregate served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::error::{Error, ErrorCode};
use crate::domain::post::Post;
use crate::domain::user::User;
use crate::inbound::http::dto::{
    FollowListResponse, FormResponse, FormValues, PageShell, PaginationMeta, ProfileResponse,
    SigninRequest, SignupRequest, UpdateRequest, UserListResponse,
};
use crate::inbound::http::flash::{Flash, FlashKind};

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::home::home,
        crate::inbound::http::sessions::signin_form,
        crate::inbound::http::sessions::signin,
        crate::inbound::http::sessions::signout,
        crate::inbound::http::users::index,
        crate::inbound::http::users::new_form,
        crate::inbound::http::users::create,
        crate::inbound::http::users::show,
        crate::inbound::http::users::edit_form,
        crate::inbound::http::users::update,
        crate::inbound::http::users::destroy,
        crate::inbound::http::relationships::following,
        crate::inbound::http::relationships::followers,
        crate::inbound::http::relationships::follow,
        crate::inbound::http::relationships::unfollow,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Post,
        Error,
        ErrorCode,
        Flash,
        FlashKind,
        PaginationMeta,
        UserListResponse,
        ProfileResponse,
        FollowListResponse,
        FormValues,
        FormResponse,
        PageShell,
        SignupRequest,
        UpdateRequest,
        SigninRequest,
    )),
    tags(
        (name = "users", description = "User directory"),
        (name = "relationships", description = "Follow graph"),
        (name = "sessions", description = "Sign-in and sign-out"),
        (name = "home", description = "Application root"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;
