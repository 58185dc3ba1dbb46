//! Booking handlers.
//!
//! ```text
//! GET /api/v1/bookings?status=PENDING&userId=...&listingId=...
//! POST /api/v1/bookings {"listingId":"...","checkIn":"2025-03-01","checkOut":"2025-03-04","guestCount":2}
//! GET /api/v1/bookings/{id}
//! PATCH /api/v1/bookings/{id} {"status":"CONFIRMED"}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::domain::ports::CreateBookingRequest;
use crate::domain::{BookingFilter, BookingId, BookingStatus, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{BookingBody, BookingEnvelope, BookingViewBody, PageBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_date, parse_id, parse_optional_id, parse_optional_variant, parse_page,
    parse_positive_count, parse_variant, require,
};

const STATUS: FieldName = FieldName::new("status");
const USER_ID: FieldName = FieldName::new("userId");
const LISTING_ID: FieldName = FieldName::new("listingId");
const CHECK_IN: FieldName = FieldName::new("checkIn");
const CHECK_OUT: FieldName = FieldName::new("checkOut");
const GUEST_COUNT: FieldName = FieldName::new("guestCount");

/// Query parameters for `GET /api/v1/bookings`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct BookingsParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// `PENDING`, `CONFIRMED`, `CANCELLED` or `COMPLETED`.
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub listing_id: Option<String>,
}

/// Body for `POST /api/v1/bookings`.
///
/// Dates accept `YYYY-MM-DD` or RFC 3339. `userId` defaults to the caller.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    pub listing_id: Option<String>,
    pub user_id: Option<String>,
    #[schema(example = "2025-03-01")]
    pub check_in: Option<String>,
    #[schema(example = "2025-03-04")]
    pub check_out: Option<String>,
    #[schema(value_type = Option<u32>, minimum = 1, example = 2)]
    pub guest_count: Option<Number>,
}

/// Body for `PATCH /api/v1/bookings/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateBookingStatusBody {
    #[schema(example = "CONFIRMED")]
    pub status: Option<String>,
}

fn booking_id(raw: &str) -> Result<BookingId, Error> {
    parse_id(raw, FieldName::new("id"))
}

/// Paginated bookings, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    params(BookingsParams),
    responses(
        (status = 200, description = "Bookings", body = PageBody<BookingViewBody>),
        (status = 400, description = "Invalid filter or pagination", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    query: web::Query<BookingsParams>,
) -> ApiResult<web::Json<PageBody<BookingViewBody>>> {
    let page = parse_page(query.page.as_deref(), query.limit.as_deref())?;
    let filter = BookingFilter {
        status: parse_optional_variant(query.status.as_deref(), STATUS)?,
        user_id: parse_optional_id(query.user_id.as_deref(), USER_ID)?,
        listing_id: parse_optional_id(query.listing_id.as_deref(), LISTING_ID)?,
    };
    let bookings = state.bookings_query.list(filter, page).await?;
    Ok(web::Json(PageBody::from_page(bookings, BookingViewBody::from)))
}

/// Create a pending booking priced at nightly rate times nights.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingBody,
    responses(
        (status = 201, description = "Booking created", body = BookingEnvelope<BookingBody>),
        (status = 400, description = "Invalid request or rule violation", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Listing or user not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateBookingBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = CreateBookingRequest {
        listing_id: parse_id(&require(body.listing_id, LISTING_ID)?, LISTING_ID)?,
        user_id: parse_optional_id(body.user_id.as_deref(), USER_ID)?,
        check_in: parse_date(&require(body.check_in, CHECK_IN)?, CHECK_IN)?,
        check_out: parse_date(&require(body.check_out, CHECK_OUT)?, CHECK_OUT)?,
        guests: parse_positive_count(&require(body.guest_count, GUEST_COUNT)?, GUEST_COUNT)?,
        actor: caller.into_identity(),
    };
    let booking = state.bookings_command.create(request).await?;
    Ok(HttpResponse::Created().json(BookingEnvelope {
        booking: BookingBody::from(&booking),
    }))
}

/// Booking with guest and listing summaries.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking detail", body = BookingEnvelope<BookingViewBody>),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingEnvelope<BookingViewBody>>> {
    let id = booking_id(&path)?;
    let view = state.bookings_query.detail(&id).await?;
    Ok(web::Json(BookingEnvelope {
        booking: BookingViewBody::from(view),
    }))
}

/// Change a booking's status. Completed and cancelled bookings are final.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    request_body = UpdateBookingStatusBody,
    responses(
        (status = 200, description = "Updated booking", body = BookingEnvelope<BookingBody>),
        (status = 400, description = "Invalid status or terminal booking", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "updateBookingStatus"
)]
#[patch("/bookings/{id}")]
pub async fn update_booking_status(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateBookingStatusBody>,
) -> ApiResult<web::Json<BookingEnvelope<BookingBody>>> {
    let id = booking_id(&path)?;
    let raw = require(payload.into_inner().status, STATUS)?;
    let status: BookingStatus = parse_variant(&raw, STATUS)?;
    let booking = state.bookings_command.update_status(&id, status).await?;
    tracing::info!(
        actor = %caller.user_id(),
        booking_id = %id,
        %status,
        "booking status updated via API"
    );
    Ok(web::Json(BookingEnvelope {
        booking: BookingBody::from(&booking),
    }))
}
