//! Session cookie handling and the authenticated-caller extractor.
//!
//! Protected handlers take an [`AuthenticatedUser`] argument; extracting it
//! runs the [`crate::domain::ports::SessionGate`] against the `auth-token`
//! cookie, so a handler body never executes for a refused caller.

use std::fmt;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::{AccessDecision, DenyReason};
use crate::domain::session_token::{SessionIdentity, SessionToken};
use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth-token";

/// Attributes applied to every `auth-token` cookie the server writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCookieConfig {
    secure: bool,
    max_age_seconds: i64,
}

impl SessionCookieConfig {
    /// Cookie attributes; `max_age` should match the token lifetime.
    pub fn new(secure: bool, max_age: chrono::Duration) -> Self {
        Self {
            secure,
            max_age_seconds: max_age.num_seconds(),
        }
    }

    /// Cookie carrying a freshly issued token.
    pub fn issue(&self, token: &SessionToken) -> Cookie<'static> {
        Cookie::build(AUTH_COOKIE, token.as_str().to_owned())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(CookieDuration::seconds(self.max_age_seconds))
            .finish()
    }

    /// Cookie instructing the browser to drop the session.
    pub fn clear(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(AUTH_COOKIE, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .finish();
        cookie.make_removal();
        cookie
    }
}

/// Raw `auth-token` value presented with the request, if any.
pub(crate) fn session_credential(req: &HttpRequest) -> Option<String> {
    req.cookie(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

/// Error response for a refused caller, optionally clearing the cookie.
#[derive(Debug)]
pub struct SessionRejection {
    error: Error,
    clear: Option<Cookie<'static>>,
}

impl SessionRejection {
    fn denied(reason: DenyReason, cookies: SessionCookieConfig) -> Self {
        match reason {
            DenyReason::NoCredential => Error::unauthorized("authentication required").into(),
            DenyReason::InvalidCredential => Self {
                error: Error::unauthorized("invalid or expired session"),
                clear: Some(cookies.clear()),
            },
            DenyReason::Blocked => Error::forbidden("account is blocked").into(),
            DenyReason::NotFound => Error::not_found("user not found").into(),
        }
    }

    /// Domain error carried by the rejection.
    pub fn error(&self) -> &Error {
        &self.error
    }
}

impl From<Error> for SessionRejection {
    fn from(error: Error) -> Self {
        Self { error, clear: None }
    }
}

impl fmt::Display for SessionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl ResponseError for SessionRejection {
    fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = self.error.error_response();
        if let Some(cookie) = &self.clear {
            if let Err(error) = response.add_cookie(cookie) {
                tracing::warn!(%error, "failed to attach session removal cookie");
            }
        }
        response
    }
}

/// Caller admitted by the access gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(SessionIdentity);

impl AuthenticatedUser {
    /// Identity as stored at request time.
    pub fn identity(&self) -> &SessionIdentity {
        &self.0
    }

    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }

    pub fn into_identity(self) -> SessionIdentity {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = SessionRejection;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let credential = session_credential(req);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            match state.gate.authorize(credential).await? {
                AccessDecision::Allow(identity) => Ok(Self(identity)),
                AccessDecision::Deny(reason) => {
                    tracing::debug!(?reason, "request refused by access gate");
                    Err(SessionRejection::denied(reason, state.session_cookie))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockSessionGate;
    use crate::inbound::http::test_utils::TestPorts;
    use crate::test_support::fixtures;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.user_id().to_string())
    }

    fn gate_returning(decision: AccessDecision) -> MockSessionGate {
        let mut gate = MockSessionGate::new();
        gate.expect_authorize()
            .return_once(move |_| Ok(decision));
        gate
    }

    async fn call(gate: MockSessionGate, cookie: Option<&str>) -> actix_web::dev::ServiceResponse {
        let state = TestPorts {
            gate,
            ..TestPorts::default()
        }
        .into_state();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let mut request = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = cookie {
            request = request.cookie(Cookie::new(AUTH_COOKIE, value.to_owned()));
        }
        actix_test::call_service(&app, request.to_request()).await
    }

    #[actix_web::test]
    async fn admitted_callers_reach_the_handler() {
        let admin = fixtures::admin();
        let response = call(
            gate_returning(AccessDecision::Allow(fixtures::identity(&admin))),
            Some("token"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        assert_eq!(body, admin.id.to_string());
    }

    #[actix_web::test]
    async fn cookie_value_is_handed_to_the_gate() {
        let mut gate = MockSessionGate::new();
        gate.expect_authorize()
            .withf(|credential| credential.as_deref() == Some("abc.def.ghi"))
            .return_once(|_| Ok(AccessDecision::Deny(DenyReason::InvalidCredential)));
        let response = call(gate, Some("abc.def.ghi")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case(DenyReason::NoCredential, StatusCode::UNAUTHORIZED, false)]
    #[case(DenyReason::InvalidCredential, StatusCode::UNAUTHORIZED, true)]
    #[case(DenyReason::Blocked, StatusCode::FORBIDDEN, false)]
    #[case(DenyReason::NotFound, StatusCode::NOT_FOUND, false)]
    #[actix_web::test]
    async fn refusals_map_to_statuses(
        #[case] reason: DenyReason,
        #[case] status: StatusCode,
        #[case] clears_cookie: bool,
    ) {
        let response = call(gate_returning(AccessDecision::Deny(reason)), Some("t")).await;
        assert_eq!(response.status(), status);
        let removal = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == AUTH_COOKIE);
        assert_eq!(removal.is_some(), clears_cookie);
        if let Some(cookie) = removal {
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
        }
    }

    #[actix_web::test]
    async fn store_failures_never_admit() {
        let mut gate = MockSessionGate::new();
        gate.expect_authorize()
            .return_once(|_| Err(Error::service_unavailable("database unavailable")));
        let response = call(gate, Some("t")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn issued_cookie_carries_session_attributes() {
        let config = SessionCookieConfig::new(true, chrono::Duration::days(7));
        let token = crate::domain::session_token::sign(
            &fixtures::identity(&fixtures::admin()),
            &fixtures::auth_config(),
            fixtures::epoch(),
        )
        .expect("token");
        let cookie = config.issue(&token);

        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(CookieDuration::days(7)));
    }

    #[test]
    fn rejection_exposes_domain_error() {
        let rejection = SessionRejection::denied(
            DenyReason::Blocked,
            SessionCookieConfig::new(false, chrono::Duration::days(7)),
        );
        assert_eq!(rejection.error().code(), ErrorCode::Forbidden);
    }
}
