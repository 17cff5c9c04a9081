//! User directory handlers.
//!
//! Each handler resolves the request's identity, consults the policy, and
//! only then touches a port. Denials short-circuit into redirects before any
//! mutating operation runs.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::DirectoryError;
use crate::domain::{
    Action, ApiResult, Error, FieldErrors, ProfileAttrs, SignupAttrs, UserId,
};

use super::access::{deny, no_target, see_other, see_profile, ROOT_PATH, USERS_PATH};
use super::dto::{
    FormResponse, FormValues, PageQuery, PaginationMeta, ProfileResponse, SignupRequest,
    UpdateRequest, UserListResponse,
};
use super::error::{map_directory_error, map_follow_graph_error};
use super::flash::Flash;
use super::identity::resolve_identity;
use super::session::SessionContext;
use super::state::HttpState;

fn validation_failed(errors: &FieldErrors, name: &str, email: &str) -> Error {
    Error::invalid_request("validation failed").with_details(json!({
        "errors": errors,
        "user": FormValues {
            name: name.to_owned(),
            email: email.to_owned(),
        },
    }))
}

fn email_taken_errors() -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.push("email", "email address has already been taken");
    errors
}

/// Paginated user listing.
#[utoipa::path(
    get,
    path = "/users",
    params(PageQuery),
    responses(
        (status = 200, description = "One window of users", body = UserListResponse),
        (status = 303, description = "Redirect to sign-in when anonymous"),
        (status = 400, description = "Invalid page window", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn index(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let identity = resolve_identity(&session, state.directory.as_ref()).await?;
    if let Some(denied) = deny(&identity, Action::ViewList, &no_target(), &session)? {
        return Ok(denied);
    }
    let window = query.window()?;
    let page = state
        .directory
        .list(window)
        .await
        .map_err(map_directory_error)?;
    let pagination = PaginationMeta::of(&page);
    Ok(HttpResponse::Ok().json(UserListResponse {
        users: page.into_items(),
        pagination,
    }))
}

/// Registration form scaffold.
#[utoipa::path(
    get,
    path = "/users/new",
    responses((status = 200, description = "Blank registration form", body = FormResponse)),
    tags = ["users"],
    operation_id = "newUser"
)]
#[get("/users/new")]
pub async fn new_form(session: SessionContext) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(FormResponse {
        user: FormValues::default(),
        flash: session.take_flash()?,
    }))
}

/// Register a new account.
///
/// Open to everyone. On success the new user is signed in and sent to the
/// root with a welcome notice; on validation failure the field errors and
/// the attempted name/email come back for redisplay.
#[utoipa::path(
    post,
    path = "/users",
    request_body = SignupRequest,
    responses(
        (status = 303, description = "Created; redirect to root"),
        (status = 400, description = "Validation failed", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let identity = resolve_identity(&session, state.directory.as_ref()).await?;
    if let Some(denied) = deny(&identity, Action::Create, &no_target(), &session)? {
        return Ok(denied);
    }
    let attrs = SignupAttrs {
        name: payload.name.clone(),
        email: payload.email.clone(),
        password: payload.password.clone(),
        password_confirmation: payload.password_confirmation.clone(),
    };
    let valid = attrs
        .validate()
        .map_err(|errors| validation_failed(&errors, &attrs.name, &attrs.email))?;
    let new_user = valid
        .into_new_user()
        .map_err(|error| Error::internal(format!("password hashing failed: {error}")))?;
    let user = match state.directory.create(&new_user).await {
        Ok(user) => user,
        Err(DirectoryError::EmailTaken) => {
            return Err(validation_failed(
                &email_taken_errors(),
                &attrs.name,
                &attrs.email,
            ));
        }
        Err(other) => return Err(map_directory_error(other)),
    };
    session.persist_user(&user.id)?;
    session.push_flash(&Flash::success("Welcome to the sample app!"))?;
    Ok(see_other(ROOT_PATH))
}

/// Profile view: the user, a window of their posts, and their stats.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id"), PageQuery),
    responses(
        (status = 200, description = "Profile with posts and counts", body = ProfileResponse),
        (status = 303, description = "Redirect to sign-in when anonymous"),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "showUser"
)]
#[get("/users/{id}")]
pub async fn show(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let target = UserId::from_uuid(path.into_inner());
    let identity = resolve_identity(&session, state.directory.as_ref()).await?;
    if let Some(denied) = deny(&identity, Action::ViewProfile, &target, &session)? {
        return Ok(denied);
    }
    let user = state
        .directory
        .get(&target)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| Error::not_found("user not found"))?;
    let window = query.window()?;
    let posts = state
        .directory
        .posts(&target, window)
        .await
        .map_err(map_directory_error)?;
    let post_count = state
        .directory
        .post_count(&target)
        .await
        .map_err(map_directory_error)?;
    let following_count = state
        .follow_graph
        .following_count(&target)
        .await
        .map_err(map_follow_graph_error)?;
    let followers_count = state
        .follow_graph
        .followers_count(&target)
        .await
        .map_err(map_follow_graph_error)?;
    let pagination = PaginationMeta::of(&posts);
    Ok(HttpResponse::Ok().json(ProfileResponse {
        user,
        post_count,
        following_count,
        followers_count,
        posts: posts.into_items(),
        pagination,
    }))
}

/// Profile-edit form scaffold, prefilled with the current values.
#[utoipa::path(
    get,
    path = "/users/{id}/edit",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Prefilled edit form", body = FormResponse),
        (status = 303, description = "Redirect on denial"),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "editUser"
)]
#[get("/users/{id}/edit")]
pub async fn edit_form(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let target = UserId::from_uuid(path.into_inner());
    let identity = resolve_identity(&session, state.directory.as_ref()).await?;
    if let Some(denied) = deny(&identity, Action::EditOwn, &target, &session)? {
        return Ok(denied);
    }
    let user = state
        .directory
        .get(&target)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| Error::not_found("user not found"))?;
    Ok(HttpResponse::Ok().json(FormResponse {
        user: FormValues {
            name: user.name.to_string(),
            email: user.email.to_string(),
        },
        flash: session.take_flash()?,
    }))
}

/// Apply profile changes. Owner only.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateRequest,
    responses(
        (status = 303, description = "Updated; redirect to the profile"),
        (status = 400, description = "Validation failed", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateRequest>,
) -> ApiResult<HttpResponse> {
    let target = UserId::from_uuid(path.into_inner());
    let identity = resolve_identity(&session, state.directory.as_ref()).await?;
    if let Some(denied) = deny(&identity, Action::UpdateOwn, &target, &session)? {
        return Ok(denied);
    }
    let attrs = ProfileAttrs {
        name: payload.name.clone(),
        email: payload.email.clone(),
        password: payload.password.clone(),
        password_confirmation: payload.password_confirmation.clone(),
    };
    let valid = attrs
        .validate()
        .map_err(|errors| validation_failed(&errors, &attrs.name, &attrs.email))?;
    let changes = valid
        .into_changes()
        .map_err(|error| Error::internal(format!("password hashing failed: {error}")))?;
    match state.directory.update(&target, &changes).await {
        Ok(_) => {}
        Err(DirectoryError::EmailTaken) => {
            return Err(validation_failed(
                &email_taken_errors(),
                &attrs.name,
                &attrs.email,
            ));
        }
        Err(other) => return Err(map_directory_error(other)),
    }
    session.push_flash(&Flash::success("Profile updated"))?;
    Ok(see_profile(&target))
}

/// Destroy a user account. Admin only; cascades posts and follow edges.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 303, description = "Destroyed; redirect to the listing"),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "destroyUser"
)]
#[delete("/users/{id}")]
pub async fn destroy(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let target = UserId::from_uuid(path.into_inner());
    let identity = resolve_identity(&session, state.directory.as_ref()).await?;
    if let Some(denied) = deny(&identity, Action::Destroy, &target, &session)? {
        return Ok(denied);
    }
    state
        .directory
        .destroy(&target)
        .await
        .map_err(map_directory_error)?;
    session.push_flash(&Flash::success("User deleted"))?;
    Ok(see_other(USERS_PATH))
}
