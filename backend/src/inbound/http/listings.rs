//! Listing administration handlers.
//!
//! ```text
//! GET /api/v1/listings?status=ACTIVE&hostId=...&page=1&limit=10
//! POST /api/v1/listings
//! GET /api/v1/listings/{id}
//! PATCH /api/v1/listings/{id}
//! DELETE /api/v1/listings/{id}
//! ```
//!
//! Bodies arrive loosely typed so every field error can name the field it
//! belongs to.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::domain::listing::{
    validate_count, validate_description, validate_image_url, validate_location,
    validate_price, validate_title,
};
use crate::domain::ports::CreateListingRequest;
use crate::domain::{
    Error, ListingChanges, ListingDraft, ListingFilter, ListingId, ListingStatus,
    ListingValidationError, Money, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    ListingBody, ListingDetailBody, ListingEnvelope, ListingViewBody, PageBody, SuccessBody,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, listing_field_error, parse_id, parse_money, parse_optional_id,
    parse_optional_variant, parse_page, parse_variant, parse_whole_number, require,
};

const TITLE: FieldName = FieldName::new("title");
const DESCRIPTION: FieldName = FieldName::new("description");
const LOCATION: FieldName = FieldName::new("location");
const PRICE: FieldName = FieldName::new("pricePerNight");
const MAX_GUESTS: FieldName = FieldName::new("maxGuests");
const BEDROOMS: FieldName = FieldName::new("bedrooms");
const BATHROOMS: FieldName = FieldName::new("bathrooms");
const STATUS: FieldName = FieldName::new("status");
const HOST_ID: FieldName = FieldName::new("hostId");

/// Query parameters for `GET /api/v1/listings`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListingsParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// `ACTIVE`, `INACTIVE` or `ARCHIVED`.
    pub status: Option<String>,
    pub host_id: Option<String>,
}

/// Listing fields accepted by create and update.
///
/// Create requires every field except `imageUrl`, `status` and `hostId`.
/// On update an omitted field is left untouched and an empty `imageUrl`
/// clears the image.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[schema(value_type = Option<f64>, example = 150.0)]
    pub price_per_night: Option<Number>,
    #[schema(value_type = Option<u32>)]
    pub max_guests: Option<Number>,
    #[schema(value_type = Option<u32>)]
    pub bedrooms: Option<Number>,
    #[schema(value_type = Option<u32>)]
    pub bathrooms: Option<Number>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    /// Host for a new listing; defaults to the caller. Ignored on update.
    pub host_id: Option<String>,
}

fn checked<T>(result: Result<T, ListingValidationError>) -> Result<T, Error> {
    result.map_err(|err| listing_field_error(&err))
}

fn price(value: &Number) -> Result<Money, Error> {
    checked(validate_price(parse_money(value, PRICE)?))
}

fn count(value: &Number, field: FieldName) -> Result<u32, Error> {
    checked(validate_count(
        parse_whole_number(value, field)?,
        field.as_str(),
    ))
}

fn listing_id(raw: &str) -> Result<ListingId, Error> {
    parse_id(raw, FieldName::new("id"))
}

impl ListingRequest {
    fn into_draft(self) -> Result<(ListingDraft, Option<UserId>), Error> {
        let draft = ListingDraft {
            title: checked(validate_title(&require(self.title, TITLE)?))?,
            description: checked(validate_description(&require(
                self.description,
                DESCRIPTION,
            )?))?,
            location: checked(validate_location(&require(self.location, LOCATION)?))?,
            price_per_night: price(&require(self.price_per_night, PRICE)?)?,
            max_guests: count(&require(self.max_guests, MAX_GUESTS)?, MAX_GUESTS)?,
            bedrooms: count(&require(self.bedrooms, BEDROOMS)?, BEDROOMS)?,
            bathrooms: count(&require(self.bathrooms, BATHROOMS)?, BATHROOMS)?,
            image_url: match self.image_url {
                Some(raw) => checked(validate_image_url(&raw))?,
                None => None,
            },
            status: parse_optional_variant(self.status.as_deref(), STATUS)?
                .unwrap_or(ListingStatus::Active),
        };
        let host_id = parse_optional_id(self.host_id.as_deref(), HOST_ID)?;
        Ok((draft, host_id))
    }

    fn into_changes(self) -> Result<ListingChanges, Error> {
        Ok(ListingChanges {
            title: self
                .title
                .map(|raw| checked(validate_title(&raw)))
                .transpose()?,
            description: self
                .description
                .map(|raw| checked(validate_description(&raw)))
                .transpose()?,
            location: self
                .location
                .map(|raw| checked(validate_location(&raw)))
                .transpose()?,
            price_per_night: self.price_per_night.as_ref().map(price).transpose()?,
            max_guests: self
                .max_guests
                .as_ref()
                .map(|value| count(value, MAX_GUESTS))
                .transpose()?,
            bedrooms: self
                .bedrooms
                .as_ref()
                .map(|value| count(value, BEDROOMS))
                .transpose()?,
            bathrooms: self
                .bathrooms
                .as_ref()
                .map(|value| count(value, BATHROOMS))
                .transpose()?,
            image_url: self
                .image_url
                .map(|raw| checked(validate_image_url(&raw)))
                .transpose()?,
            status: self
                .status
                .map(|raw| parse_variant(&raw, STATUS))
                .transpose()?,
        })
    }
}

/// Paginated listings, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    params(ListingsParams),
    responses(
        (status = 200, description = "Listings", body = PageBody<ListingViewBody>),
        (status = 400, description = "Invalid filter or pagination", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "listListings"
)]
#[get("/listings")]
pub async fn list_listings(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    query: web::Query<ListingsParams>,
) -> ApiResult<web::Json<PageBody<ListingViewBody>>> {
    let page = parse_page(query.page.as_deref(), query.limit.as_deref())?;
    let filter = ListingFilter {
        status: parse_optional_variant(query.status.as_deref(), STATUS)?,
        host_id: parse_optional_id(query.host_id.as_deref(), HOST_ID)?,
    };
    let listings = state.listings_query.list(filter, page).await?;
    Ok(web::Json(PageBody::from_page(listings, ListingViewBody::from)))
}

/// Create a listing hosted by `hostId` or, when absent, the caller.
#[utoipa::path(
    post,
    path = "/api/v1/listings",
    request_body = ListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ListingEnvelope<ListingBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Host not found", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "createListing"
)]
#[post("/listings")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<ListingRequest>,
) -> ApiResult<HttpResponse> {
    let (draft, host_id) = payload.into_inner().into_draft()?;
    let listing = state
        .listings_command
        .create(CreateListingRequest {
            draft,
            host_id,
            actor: caller.into_identity(),
        })
        .await?;
    Ok(HttpResponse::Created().json(ListingEnvelope {
        listing: ListingBody::from(&listing),
    }))
}

/// Listing with host and recent bookings.
#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing detail", body = ListingEnvelope<ListingDetailBody>),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "getListing"
)]
#[get("/listings/{id}")]
pub async fn get_listing(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListingEnvelope<ListingDetailBody>>> {
    let id = listing_id(&path)?;
    let detail = state.listings_query.detail(&id).await?;
    Ok(web::Json(ListingEnvelope {
        listing: ListingDetailBody::from(detail),
    }))
}

/// Partially update a listing. Any status may follow any other.
#[utoipa::path(
    patch,
    path = "/api/v1/listings/{id}",
    params(("id" = String, Path, description = "Listing id")),
    request_body = ListingRequest,
    responses(
        (status = 200, description = "Updated listing", body = ListingEnvelope<ListingBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "updateListing"
)]
#[patch("/listings/{id}")]
pub async fn update_listing(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<ListingRequest>,
) -> ApiResult<web::Json<ListingEnvelope<ListingBody>>> {
    let id = listing_id(&path)?;
    let changes = payload.into_inner().into_changes()?;
    let listing = state.listings_command.update(&id, changes).await?;
    Ok(web::Json(ListingEnvelope {
        listing: ListingBody::from(&listing),
    }))
}

/// Archive a listing. Repeating the call is harmless.
#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}",
    params(("id" = String, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Listing archived", body = SuccessBody),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "deleteListing"
)]
#[delete("/listings/{id}")]
pub async fn delete_listing(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<SuccessBody>> {
    let id = listing_id(&path)?;
    state.listings_command.archive(&id).await?;
    tracing::info!(actor = %caller.user_id(), listing_id = %id, "listing deleted via API");
    Ok(web::Json(SuccessBody { success: true }))
}
