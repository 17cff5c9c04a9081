//! End-to-end flows over the composed application with in-memory ports.

use actix_web::http::{header, StatusCode};
use actix_web::test as actix_test;
use serde_json::{json, Value};

use backend::test_support::{signin_cookie, test_app, InMemoryStore};

fn location(response: &actix_web::dev::ServiceResponse) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
}

#[actix_web::test]
async fn anonymous_requests_redirect_to_signin_and_mutate_nothing() {
    let store = InMemoryStore::new();
    let user = store.seed_user("Example User", "user@example.com", "password", false);
    let other = store.seed_user("Other", "other@example.com", "password", false);
    let base = chrono::Utc::now();
    store.seed_edge(&user.id, &other.id, base);
    store.seed_post(&user.id, "hello", base);
    let app = actix_test::init_service(test_app(&store)).await;

    let requests = [
        actix_test::TestRequest::get().uri("/users"),
        actix_test::TestRequest::get().uri(&format!("/users/{}", user.id)),
        actix_test::TestRequest::get().uri(&format!("/users/{}/edit", user.id)),
        actix_test::TestRequest::get().uri(&format!("/users/{}/following", user.id)),
        actix_test::TestRequest::get().uri(&format!("/users/{}/followers", user.id)),
        actix_test::TestRequest::put()
            .uri(&format!("/users/{}", user.id))
            .set_json(json!({ "name": "X", "email": "x@example.com" })),
        actix_test::TestRequest::delete().uri(&format!("/users/{}", user.id)),
        actix_test::TestRequest::post().uri(&format!("/users/{}/follow", other.id)),
        actix_test::TestRequest::delete().uri(&format!("/users/{}/follow", other.id)),
    ];
    for request in requests {
        let response = actix_test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/signin");
    }

    // Nothing changed behind the redirects.
    assert_eq!(store.user_count(), 2);
    assert_eq!(store.edge_count(), 1);
    assert_eq!(store.post_count(), 1);
    let unchanged = store.user(&user.id).expect("user still present");
    assert_eq!(unchanged.name.as_str(), "Example User");
}

#[actix_web::test]
async fn registration_signs_in_and_lands_on_root_with_welcome() {
    let store = InMemoryStore::new();
    let app = actix_test::init_service(test_app(&store)).await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({
                "name": "New User",
                "email": "user@example.com",
                "password": "foobar",
                "passwordConfirmation": "foobar"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&created), "/");
    assert_eq!(store.user_count(), 1);
    let cookie = created
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();

    let home = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let shell: Value = serde_json::from_slice(&actix_test::read_body(home).await).expect("shell");
    assert_eq!(shell["flash"]["message"], "Welcome to the sample app!");

    // The fresh session may browse the directory straight away.
    let listing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(listing.status(), StatusCode::OK);
}

#[actix_web::test]
async fn profile_update_round_trip() {
    let store = InMemoryStore::new();
    let user = store.seed_user("Example User", "user@example.com", "password", false);
    let app = actix_test::init_service(test_app(&store)).await;
    let cookie = signin_cookie(&app, "user@example.com", "password").await;

    let updated = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/users/{}", user.id))
            .cookie(cookie.clone())
            .set_json(json!({
                "name": "New Name",
                "email": "user@example.org",
                "password": "barbaz",
                "passwordConfirmation": "barbaz"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&updated), format!("/users/{}", user.id));

    // The old password no longer signs in; the new one does.
    let stale = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signin")
            .set_json(json!({ "email": "user@example.org", "password": "password" }))
            .to_request(),
    )
    .await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
    let fresh = signin_cookie(&app, "user@example.org", "barbaz").await;
    let profile = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users/{}", user.id))
            .cookie(fresh)
            .to_request(),
    )
    .await;
    assert_eq!(profile.status(), StatusCode::OK);
    let body: Value =
        serde_json::from_slice(&actix_test::read_body(profile).await).expect("profile");
    assert_eq!(body["user"]["name"], "New Name");
}

#[actix_web::test]
async fn admin_destroy_cascades_posts_and_edges() {
    let store = InMemoryStore::new();
    let doomed = store.seed_user("Doomed", "doomed@example.com", "password", false);
    let bystander = store.seed_user("Bystander", "bystander@example.com", "password", false);
    store.seed_user("Admin", "admin@example.com", "password", true);
    let base = chrono::Utc::now();
    store.seed_post(&doomed.id, "first", base);
    store.seed_post(&doomed.id, "second", base);
    store.seed_post(&bystander.id, "keep me", base);
    store.seed_edge(&doomed.id, &bystander.id, base);
    store.seed_edge(&bystander.id, &doomed.id, base);
    let app = actix_test::init_service(test_app(&store)).await;
    let cookie = signin_cookie(&app, "admin@example.com", "password").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/users/{}", doomed.id))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users");

    assert_eq!(store.user_count(), 2);
    assert!(store.user(&doomed.id).is_none());
    // Both edge directions and the victim's posts went with the account.
    assert_eq!(store.edge_count(), 0);
    assert_eq!(store.post_count(), 1);
}

#[actix_web::test]
async fn destroying_a_missing_user_is_a_not_found() {
    let store = InMemoryStore::new();
    store.seed_user("Admin", "admin@example.com", "password", true);
    let app = actix_test::init_service(test_app(&store)).await;
    let cookie = signin_cookie(&app, "admin@example.com", "password").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/users/{}", uuid::Uuid::new_v4()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.user_count(), 1);
}

#[actix_web::test]
async fn post_count_is_independent_of_the_feed_window() {
    let store = InMemoryStore::new();
    let user = store.seed_user("Prolific", "prolific@example.com", "password", false);
    let base = chrono::Utc::now();
    for n in 0..35 {
        store.seed_post(&user.id, &format!("post {n}"), base - chrono::Duration::minutes(n));
    }
    let app = actix_test::init_service(test_app(&store)).await;
    let cookie = signin_cookie(&app, "prolific@example.com", "password").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users/{}?perPage=10", user.id))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Value =
        serde_json::from_slice(&actix_test::read_body(response).await).expect("profile");
    assert_eq!(body["posts"].as_array().expect("posts").len(), 10);
    assert_eq!(body["postCount"], 35);
    assert_eq!(body["pagination"]["totalPages"], 4);
}
