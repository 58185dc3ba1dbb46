//! Session endpoints.
//!
//! ```text
//! POST /api/v1/auth/login {"email":"admin@example.com","password":"password1"}
//! POST /api/v1/auth/logout
//! GET /api/v1/auth/me
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::AccessDecision;
use crate::domain::{LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{SessionEnvelope, SessionUserBody, SuccessBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::{AuthenticatedUser, session_credential};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::login_field_error;

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[schema(example = "password1")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Authenticate with email and password and set the `auth-token` cookie.
///
/// A caller already holding a valid session gets its current identity back
/// and no new token is issued.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionEnvelope,
            headers(("Set-Cookie" = String, description = "auth-token session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 403, description = "Account blocked", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    if let Some(credential) = session_credential(&req) {
        if let AccessDecision::Allow(identity) = state.gate.authorize(Some(credential)).await? {
            let user = state.users_query.find(&identity.user_id).await?;
            tracing::debug!(user_id = %user.id, "login short-circuited by existing session");
            return Ok(HttpResponse::Ok().json(SessionEnvelope {
                user: SessionUserBody::from(&user),
            }));
        }
    }

    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| login_field_error(&err))?;
    let outcome = state.login.login(&credentials).await?;
    Ok(HttpResponse::Ok()
        .cookie(state.session_cookie.issue(&outcome.token))
        .json(SessionEnvelope {
            user: SessionUserBody::from(&outcome.user),
        }))
}

/// Drop the session cookie. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Cookie cleared", body = SuccessBody)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(state.session_cookie.clear())
        .json(SuccessBody { success: true })
}

/// Identity of the signed-in caller.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = SessionEnvelope),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Account blocked", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<SessionEnvelope>> {
    let user = state.users_query.find(&caller.user_id()).await?;
    Ok(web::Json(SessionEnvelope {
        user: SessionUserBody::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error;
    use crate::domain::ports::{DenyReason, LoginOutcome, MockLoginService, MockUsersQuery};
    use crate::domain::session_token::sign;
    use crate::inbound::http::session::AUTH_COOKIE;
    use crate::inbound::http::test_utils::{TestPorts, session_cookie, test_app};
    use crate::test_support::fixtures;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn login_request(email: &str, password: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": email, "password": password }))
    }

    fn users_returning(user: crate::domain::User) -> MockUsersQuery {
        let mut users = MockUsersQuery::new();
        users.expect_find().return_once(move |_| Ok(user));
        users
    }

    #[actix_web::test]
    async fn successful_login_sets_cookie_and_returns_user() {
        let admin = fixtures::admin();
        let token = sign(&fixtures::identity(&admin), &fixtures::auth_config(), fixtures::epoch())
            .expect("token");
        let mut login_service = MockLoginService::new();
        let returned = admin.clone();
        login_service
            .expect_login()
            .withf(|credentials| credentials.email().as_ref() == "admin@example.com")
            .return_once(move |_| {
                Ok(LoginOutcome {
                    user: returned,
                    token,
                })
            });
        let app = actix_test::init_service(test_app(TestPorts {
            login: login_service,
            ..TestPorts::default()
        }))
        .await;

        let response =
            actix_test::call_service(&app, login_request("admin@example.com", "password1").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == AUTH_COOKIE)
            .expect("auth cookie");
        assert!(!cookie.value().is_empty());
        assert_eq!(cookie.http_only(), Some(true));

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["user"]["email"], "admin@example.com");
        assert_eq!(body["user"]["role"], "ADMIN");
        assert_eq!(body["user"]["isBlocked"], false);
    }

    #[rstest]
    #[case("not-an-email", "password1", "email")]
    #[case("admin@example.com", "short", "password")]
    #[actix_web::test]
    async fn malformed_credentials_are_rejected_before_lookup(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let mut login_service = MockLoginService::new();
        login_service.expect_login().never();
        let app = actix_test::init_service(test_app(TestPorts {
            login: login_service,
            ..TestPorts::default()
        }))
        .await;

        let response =
            actix_test::call_service(&app, login_request(email, password).to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn wrong_credentials_are_unauthorised() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_login()
            .return_once(|_| Err(Error::unauthorized("invalid credentials")));
        let app = actix_test::init_service(test_app(TestPorts {
            login: login_service,
            ..TestPorts::default()
        }))
        .await;

        let response =
            actix_test::call_service(&app, login_request("admin@example.com", "password2").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(
            response
                .response()
                .cookies()
                .all(|cookie| cookie.name() != AUTH_COOKIE)
        );
    }

    #[actix_web::test]
    async fn existing_session_short_circuits_login() {
        let admin = fixtures::admin();
        let mut ports = TestPorts::signed_in_as(&admin);
        ports.users_query = users_returning(admin.clone());
        ports.login.expect_login().never();
        let app = actix_test::init_service(test_app(ports)).await;

        let response = actix_test::call_service(
            &app,
            login_request("someone@example.com", "whatever1")
                .cookie(session_cookie())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .response()
                .cookies()
                .all(|cookie| cookie.name() != AUTH_COOKIE)
        );
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["user"]["id"], admin.id.to_string());
    }

    #[actix_web::test]
    async fn stale_cookie_falls_through_to_credentials() {
        let admin = fixtures::admin();
        let token = sign(&fixtures::identity(&admin), &fixtures::auth_config(), fixtures::epoch())
            .expect("token");
        let mut ports = TestPorts::default();
        ports
            .gate
            .expect_authorize()
            .return_once(|_| Ok(AccessDecision::Deny(DenyReason::InvalidCredential)));
        let returned = admin.clone();
        ports.login.expect_login().return_once(move |_| {
            Ok(LoginOutcome {
                user: returned,
                token,
            })
        });
        let app = actix_test::init_service(test_app(ports)).await;

        let response = actix_test::call_service(
            &app,
            login_request("admin@example.com", "password1")
                .cookie(session_cookie())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn logout_clears_cookie() {
        let app = actix_test::init_service(test_app(TestPorts::default())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == AUTH_COOKIE)
            .expect("removal cookie");
        assert_eq!(cookie.value(), "");
    }

    #[actix_web::test]
    async fn me_returns_stored_user() {
        let guest = fixtures::guest();
        let mut ports = TestPorts::signed_in_as(&guest);
        ports.users_query = users_returning(guest.clone());
        let app = actix_test::init_service(test_app(ports)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/auth/me")
                .cookie(session_cookie())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["user"]["name"], "guest fixture");
        assert_eq!(body["user"]["role"], "USER");
    }

    #[actix_web::test]
    async fn me_without_cookie_is_unauthorised() {
        let mut ports = TestPorts::default();
        ports
            .gate
            .expect_authorize()
            .withf(Option::is_none)
            .return_once(|_| Ok(AccessDecision::Deny(DenyReason::NoCredential)));
        ports.users_query.expect_find().never();
        let app = actix_test::init_service(test_app(ports)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/auth/me")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
