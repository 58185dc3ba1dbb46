//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod bookings;
pub mod dto;
pub mod error;
pub mod health;
pub mod listings;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler plus the extractor error handlers.
///
/// Mount inside the versioned scope:
/// `web::scope("/api/v1").configure(configure_api)`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(listings::list_listings)
        .service(listings::create_listing)
        .service(listings::get_listing)
        .service(listings::update_listing)
        .service(listings::delete_listing)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(bookings::list_bookings)
        .service(bookings::create_booking)
        .service(bookings::get_booking)
        .service(bookings::update_booking_status);
}
