//! Follow graph handlers: listings and follow/unfollow mutations.
//!
//! Viewing any user's follow lists requires a signed-in identity and nothing
//! more. The follower side of a mutation is always the current identity, so
//! no ownership check applies beyond authentication.

use actix_web::{delete, get, post, web, HttpResponse};
use uuid::Uuid;

use crate::domain::{Action, ApiResult, Error, FollowEdge, Identity, UserId};

use super::access::{deny, see_other, see_profile, SIGNIN_PATH};
use super::dto::{FollowListResponse, PageQuery, PaginationMeta};
use super::error::{map_directory_error, map_follow_graph_error};
use super::identity::resolve_identity;
use super::session::SessionContext;
use super::state::HttpState;

async fn follow_listing(
    session: SessionContext,
    state: web::Data<HttpState>,
    target: UserId,
    query: PageQuery,
    action: Action,
) -> ApiResult<HttpResponse> {
    let identity = resolve_identity(&session, state.directory.as_ref()).await?;
    if let Some(denied) = deny(&identity, action, &target, &session)? {
        return Ok(denied);
    }
    state
        .directory
        .get(&target)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| Error::not_found("user not found"))?;
    let window = query.window()?;
    let page = match action {
        Action::ViewFollowers => state.follow_graph.followers(&target, window).await,
        _ => state.follow_graph.following(&target, window).await,
    }
    .map_err(map_follow_graph_error)?;
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
    let pagination = PaginationMeta::of(&page);
    Ok(HttpResponse::Ok().json(FollowListResponse {
        users: page.into_items(),
        following_count,
        followers_count,
        pagination,
    }))
}

/// Users the subject follows, most recent relationship first.
#[utoipa::path(
    get,
    path = "/users/{id}/following",
    params(("id" = Uuid, Path, description = "User id"), PageQuery),
    responses(
        (status = 200, description = "Followed users", body = FollowListResponse),
        (status = 303, description = "Redirect to sign-in when anonymous"),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["relationships"],
    operation_id = "listFollowing"
)]
#[get("/users/{id}/following")]
pub async fn following(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let target = UserId::from_uuid(path.into_inner());
    follow_listing(session, state, target, *query, Action::ViewFollowing).await
}

/// Users following the subject, most recent relationship first.
#[utoipa::path(
    get,
    path = "/users/{id}/followers",
    params(("id" = Uuid, Path, description = "User id"), PageQuery),
    responses(
        (status = 200, description = "Followers", body = FollowListResponse),
        (status = 303, description = "Redirect to sign-in when anonymous"),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["relationships"],
    operation_id = "listFollowers"
)]
#[get("/users/{id}/followers")]
pub async fn followers(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let target = UserId::from_uuid(path.into_inner());
    follow_listing(session, state, target, *query, Action::ViewFollowers).await
}

/// Start following the target user. Idempotent.
#[utoipa::path(
    post,
    path = "/users/{id}/follow",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 303, description = "Followed; redirect to the profile"),
        (status = 400, description = "Self-follow attempt", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["relationships"],
    operation_id = "followUser"
)]
#[post("/users/{id}/follow")]
pub async fn follow(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let target = UserId::from_uuid(path.into_inner());
    let identity = resolve_identity(&session, state.directory.as_ref()).await?;
    if let Some(denied) = deny(&identity, Action::Follow, &target, &session)? {
        return Ok(denied);
    }
    let Identity::Authenticated { id: follower, .. } = identity else {
        return Ok(see_other(SIGNIN_PATH));
    };
    let edge = FollowEdge::new(follower, target)
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    state
        .follow_graph
        .follow(&edge)
        .await
        .map_err(map_follow_graph_error)?;
    Ok(see_profile(&target))
}

/// Stop following the target user. Removing a missing edge is a no-op.
#[utoipa::path(
    delete,
    path = "/users/{id}/follow",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 303, description = "Unfollowed; redirect to the profile"),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["relationships"],
    operation_id = "unfollowUser"
)]
#[delete("/users/{id}/follow")]
pub async fn unfollow(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let target = UserId::from_uuid(path.into_inner());
    let identity = resolve_identity(&session, state.directory.as_ref()).await?;
    if let Some(denied) = deny(&identity, Action::Unfollow, &target, &session)? {
        return Ok(denied);
    }
    let Identity::Authenticated { id: follower, .. } = identity else {
        return Ok(see_other(SIGNIN_PATH));
    };
    state
        .directory
        .get(&target)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| Error::not_found("user not found"))?;
    state
        .follow_graph
        .unfollow(&follower, &target)
        .await
        .map_err(map_follow_graph_error)?;
    Ok(see_profile(&target))
}

#[cfg(test)]
mod tests {
    //! Handler coverage over in-memory ports.
    use super::*;
    use actix_web::http::{header, StatusCode};
    use actix_web::test as actix_test;
    use serde_json::Value;

    use crate::test_support::{signin_cookie, test_app, InMemoryStore};

    #[actix_web::test]
    async fn follow_pages_redirect_anonymous_to_signin() {
        let store = InMemoryStore::new();
        let user = store.seed_user("Example User", "user@example.com", "password", false);
        let app = actix_test::init_service(test_app(&store)).await;

        for path in [
            format!("/users/{}/following", user.id),
            format!("/users/{}/followers", user.id),
        ] {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::get().uri(&path).to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(
                response
                    .headers()
                    .get(header::LOCATION)
                    .and_then(|value| value.to_str().ok()),
                Some("/signin")
            );
        }
    }

    #[actix_web::test]
    async fn signed_in_users_see_other_users_follow_lists() {
        let store = InMemoryStore::new();
        let viewer = store.seed_user("Viewer", "viewer@example.com", "password", false);
        let other = store.seed_user("Other", "other@example.com", "password", false);
        let app = actix_test::init_service(test_app(&store)).await;
        let cookie = signin_cookie(&app, "viewer@example.com", "password").await;

        let follow = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/users/{}/follow", other.id))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(follow.status(), StatusCode::SEE_OTHER);

        let followers = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/users/{}/followers", other.id))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(followers).await).expect("followers");
        let ids: Vec<&str> = body["users"]
            .as_array()
            .expect("users")
            .iter()
            .filter_map(|user| user["id"].as_str())
            .collect();
        assert_eq!(ids, vec![viewer.id.to_string().as_str()]);
        assert_eq!(body["followersCount"], 1);

        let following = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/users/{}/following", viewer.id))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(following).await).expect("following");
        assert_eq!(body["followingCount"], 1);
    }

    #[actix_web::test]
    async fn double_follow_leaves_exactly_one_edge() {
        let store = InMemoryStore::new();
        store.seed_user("Follower", "follower@example.com", "password", false);
        let followed = store.seed_user("Followed", "followed@example.com", "password", false);
        let app = actix_test::init_service(test_app(&store)).await;
        let cookie = signin_cookie(&app, "follower@example.com", "password").await;

        for _ in 0..2 {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri(&format!("/users/{}/follow", followed.id))
                    .cookie(cookie.clone())
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
        }
        assert_eq!(store.edge_count(), 1);
    }

    #[actix_web::test]
    async fn self_follow_is_rejected_before_the_store() {
        let store = InMemoryStore::new();
        let user = store.seed_user("Example User", "user@example.com", "password", false);
        let app = actix_test::init_service(test_app(&store)).await;
        let cookie = signin_cookie(&app, "user@example.com", "password").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/users/{}/follow", user.id))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.edge_count(), 0);
    }

    #[actix_web::test]
    async fn unfollow_is_a_no_op_when_no_edge_exists() {
        let store = InMemoryStore::new();
        store.seed_user("Follower", "follower@example.com", "password", false);
        let other = store.seed_user("Other", "other@example.com", "password", false);
        let app = actix_test::init_service(test_app(&store)).await;
        let cookie = signin_cookie(&app, "follower@example.com", "password").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/users/{}/follow", other.id))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(store.edge_count(), 0);
    }

    #[actix_web::test]
    async fn following_a_missing_user_is_a_not_found() {
        let store = InMemoryStore::new();
        store.seed_user("Follower", "follower@example.com", "password", false);
        let app = actix_test::init_service(test_app(&store)).await;
        let cookie = signin_cookie(&app, "follower@example.com", "password").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/users/{}/follow", Uuid::new_v4()))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.edge_count(), 0);
    }
}
