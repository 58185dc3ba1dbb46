//! Session cookie issue, expiry and revocation through the access gate.

#[allow(dead_code)]
mod support;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use chrono::Duration;
use rental_admin::domain::TRACE_ID_HEADER;
use rental_admin::domain::session_token::{AuthConfig, TokenSecret, sign};
use rental_admin::inbound::http::session::AUTH_COOKIE;
use rental_admin::test_support::fixtures::{self, epoch};
use rstest::{fixture, rstest};
use serde_json::json;
use support::{World, init_app, login, send};

#[fixture]
fn world() -> World {
    World::new()
}

fn me(cookie: Cookie<'static>) -> TestRequest {
    TestRequest::get().uri("/api/v1/auth/me").cookie(cookie)
}

#[rstest]
#[actix_web::test]
async fn login_sets_an_http_only_cookie(world: World) {
    world.seed_user(fixtures::admin());
    let app = init_app(&world).await;

    let response = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "admin@example.com", "password": "password1" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == AUTH_COOKIE)
        .expect("session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(actix_web::cookie::time::Duration::days(7)));

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["user"]["role"], "ADMIN");
    assert!(body["user"].get("passwordHash").is_none());
}

#[rstest]
#[case("admin@example.com", "wrong-password")]
#[case("nobody@example.com", "password1")]
#[actix_web::test]
async fn bad_credentials_share_one_answer(
    world: World,
    #[case] email: &str,
    #[case] password: &str,
) {
    world.seed_user(fixtures::admin());
    let app = init_app(&world).await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid credentials");
}

#[rstest]
#[actix_web::test]
async fn blocking_revokes_an_existing_session(world: World) {
    world.seed_user(fixtures::admin());
    let guest = world.seed_user(fixtures::guest());
    let app = init_app(&world).await;
    let admin_cookie = login(&app, "admin@example.com").await;
    let guest_cookie = login(&app, "guest@example.com").await;

    let (status, _) = send(&app, me(guest_cookie.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        TestRequest::patch()
            .uri(&format!("/api/v1/users/{}", guest.id))
            .cookie(admin_cookie)
            .set_json(json!({ "isBlocked": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["isBlocked"], true);

    let (status, body) = send(&app, me(guest_cookie)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (status, _) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "guest@example.com", "password": "password1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn session_expires_after_seven_days(world: World) {
    world.seed_user(fixtures::admin());
    let app = init_app(&world).await;
    let cookie = login(&app, "admin@example.com").await;

    world.clock.advance(Duration::days(7) - Duration::seconds(1));
    let (status, _) = send(&app, me(cookie.clone())).await;
    assert_eq!(status, StatusCode::OK);

    world.clock.advance(Duration::seconds(1));
    let response = test::call_service(&app, me(cookie).to_request()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let cleared = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == AUTH_COOKIE)
        .expect("removal cookie");
    assert_eq!(cleared.value(), "");
}

#[rstest]
#[actix_web::test]
async fn token_signed_with_another_secret_is_refused(world: World) {
    let admin = world.seed_user(fixtures::admin());
    let app = init_app(&world).await;
    let foreign = AuthConfig::new(TokenSecret::new(vec![3_u8; 32]));
    let token = sign(&fixtures::identity(&admin), &foreign, epoch()).expect("sign");

    let (status, body) = send(
        &app,
        me(Cookie::new(AUTH_COOKIE, token.as_str().to_owned())),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn anonymous_requests_carry_a_trace_id(world: World) {
    let app = init_app(&world).await;

    let response = test::call_service(
        &app,
        TestRequest::get().uri("/api/v1/listings").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["traceId"], header);
}

#[rstest]
#[actix_web::test]
async fn logout_clears_the_cookie_without_a_session(world: World) {
    let app = init_app(&world).await;

    let response = test::call_service(
        &app,
        TestRequest::post().uri("/api/v1/auth/logout").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == AUTH_COOKIE)
        .expect("removal cookie");
    assert_eq!(cleared.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
}
