//! User administration handlers.
//!
//! ```text
//! GET /api/v1/users?page=1&limit=10
//! GET /api/v1/users/{id}
//! PATCH /api/v1/users/{id} {"name":"Ada","isBlocked":true}
//! ```

use actix_web::{get, patch, web};
use serde::{Deserialize, Serialize};

use crate::domain::{DisplayName, Error, UserChanges, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{PageBody, UserBody, UserDetailBody, UserEnvelope, UserSummaryBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_page, user_field_error};

/// `page` / `limit` query parameters shared by list endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number (default 1).
    pub page: Option<String>,
    /// Page size, 1 to 100 (default 10).
    pub limit: Option<String>,
}

/// Partial update body for `PATCH /api/v1/users/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub is_blocked: Option<bool>,
}

impl TryFrom<UpdateUserRequest> for UserChanges {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        let name = value
            .name
            .map(DisplayName::new)
            .transpose()
            .map_err(|err| user_field_error(&err))?;
        Ok(Self {
            name,
            is_blocked: value.is_blocked,
        })
    }
}

fn user_id(raw: &str) -> Result<UserId, Error> {
    parse_id(raw, FieldName::new("id"))
}

/// Paginated users with listing and booking counts.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Users", body = PageBody<UserSummaryBody>),
        (status = 400, description = "Invalid pagination", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<PageBody<UserSummaryBody>>> {
    let page = parse_page(query.page.as_deref(), query.limit.as_deref())?;
    let users = state.users_query.list(page).await?;
    Ok(web::Json(PageBody::from_page(users, UserSummaryBody::from)))
}

/// A user with recent listings and bookings.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User detail", body = UserEnvelope<UserDetailBody>),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserEnvelope<UserDetailBody>>> {
    let id = user_id(&path)?;
    let detail = state.users_query.detail(&id).await?;
    Ok(web::Json(UserEnvelope {
        user: UserDetailBody::from(detail),
    }))
}

/// Rename a user or change the blocked flag. Admins cannot be blocked.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserEnvelope<UserBody>),
        (status = 400, description = "Invalid request or rule violation", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserEnvelope<UserBody>>> {
    let id = user_id(&path)?;
    let changes = UserChanges::try_from(payload.into_inner())?;
    let user = state.users_command.update(&id, changes).await?;
    tracing::info!(actor = %caller.user_id(), user_id = %id, "user updated via API");
    Ok(web::Json(UserEnvelope {
        user: UserBody::from(&user),
    }))
}
