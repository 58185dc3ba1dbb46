//! End-to-end booking scenarios over the in-memory store.

#[allow(dead_code)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rental_admin::domain::BookingStatus;
use rental_admin::test_support::fixtures;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use support::{World, init_app, login, send};

#[fixture]
fn world() -> World {
    World::new()
}

fn booking_request(listing_id: impl ToString, guests: u32) -> Value {
    json!({
        "listingId": listing_id.to_string(),
        "checkIn": "2025-03-01",
        "checkOut": "2025-03-04",
        "guestCount": guests
    })
}

#[rstest]
#[actix_web::test]
async fn booking_moves_through_its_lifecycle_then_freezes(world: World) {
    let admin = world.seed_user(fixtures::admin());
    let listing = world.seed_listing(fixtures::listing(admin.id));
    let app = init_app(&world).await;
    let cookie = login(&app, "admin@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/bookings")
            .cookie(cookie.clone())
            .set_json(booking_request(listing.id, 2)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["booking"]["totalPrice"], json!(450.0));
    assert_eq!(body["booking"]["status"], "PENDING");
    assert_eq!(body["booking"]["userId"], admin.id.to_string());
    assert_eq!(body["booking"]["guestCount"], 2);
    let id = body["booking"]["id"]
        .as_str()
        .expect("booking id")
        .to_owned();

    for next in ["CONFIRMED", "COMPLETED"] {
        let (status, body) = send(
            &app,
            TestRequest::patch()
                .uri(&format!("/api/v1/bookings/{id}"))
                .cookie(cookie.clone())
                .set_json(json!({ "status": next })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "transition to {next}");
        assert_eq!(body["booking"]["status"], next);
    }

    let (status, body) = send(
        &app,
        TestRequest::patch()
            .uri(&format!("/api/v1/bookings/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "status": "CANCELLED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "business_rule_violation");
    assert_eq!(body["details"]["code"], "terminal_state");
    assert_eq!(body["details"]["currentStatus"], "COMPLETED");

    let stored = world.store.bookings();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, BookingStatus::Completed);

    let (status, body) = send(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/bookings/{id}"))
            .cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["listing"]["title"], listing.title);
    assert_eq!(body["booking"]["user"]["email"], "admin@example.com");
}

#[rstest]
#[actix_web::test]
async fn over_capacity_booking_persists_nothing(world: World) {
    let admin = world.seed_user(fixtures::admin());
    let listing = world.seed_listing(fixtures::listing(admin.id));
    let app = init_app(&world).await;
    let cookie = login(&app, "admin@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/bookings")
            .cookie(cookie)
            .set_json(booking_request(listing.id, 5)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "guest_count_exceeded");
    assert!(world.store.bookings().is_empty());
}

#[rstest]
#[actix_web::test]
async fn zero_guest_booking_is_refused(world: World) {
    let admin = world.seed_user(fixtures::admin());
    let listing = world.seed_listing(fixtures::listing(admin.id));
    let app = init_app(&world).await;
    let cookie = login(&app, "admin@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/bookings")
            .cookie(cookie)
            .set_json(booking_request(listing.id, 0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"], json!({ "field": "guestCount", "code": "invalid_value" }));
    assert!(world.store.bookings().is_empty());
}

#[rstest]
#[case("2025-03-04", "2025-03-04")]
#[case("2025-03-04", "2025-03-01")]
#[actix_web::test]
async fn empty_or_reversed_stays_are_refused(
    world: World,
    #[case] check_in: &str,
    #[case] check_out: &str,
) {
    let admin = world.seed_user(fixtures::admin());
    let listing = world.seed_listing(fixtures::listing(admin.id));
    let app = init_app(&world).await;
    let cookie = login(&app, "admin@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/bookings")
            .cookie(cookie)
            .set_json(json!({
                "listingId": listing.id.to_string(),
                "checkIn": check_in,
                "checkOut": check_out,
                "guestCount": 1
            })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_date_range");
    assert!(world.store.bookings().is_empty());
}

#[rstest]
#[actix_web::test]
async fn booking_for_unknown_listing_is_not_found(world: World) {
    world.seed_user(fixtures::admin());
    let app = init_app(&world).await;
    let cookie = login(&app, "admin@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/bookings")
            .cookie(cookie)
            .set_json(booking_request(uuid::Uuid::new_v4(), 1)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert!(body["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn bookings_list_filters_by_status(world: World) {
    let admin = world.seed_user(fixtures::admin());
    let guest = world.seed_user(fixtures::guest());
    let listing = world.seed_listing(fixtures::listing(admin.id));
    world.store.insert_booking(fixtures::booking(
        &listing,
        guest.id,
        BookingStatus::Pending,
    ));
    world.store.insert_booking(fixtures::booking(
        &listing,
        guest.id,
        BookingStatus::Cancelled,
    ));
    let app = init_app(&world).await;
    let cookie = login(&app, "admin@example.com").await;

    let (status, body) = send(
        &app,
        TestRequest::get()
            .uri("/api/v1/bookings?status=CANCELLED")
            .cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["items"][0]["status"], "CANCELLED");
    assert_eq!(body["items"][0]["user"]["email"], "guest@example.com");
}
