use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use busdesk_api::{app, AppState};
use busdesk_core::models::{BookingRecord, BookingStatus, NewBooking, Source};
use busdesk_core::ViewState;
use busdesk_store::MockFeed;
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use tower::ServiceExt;

fn booking(i: usize, source: Source) -> BookingRecord {
    let departs_at = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
        + Duration::hours(i as i64 * 7);
    BookingRecord::new(NewBooking {
        id: format!("BKG-{}", 10000 + i),
        passenger_name: format!("Traveller {}", i + 1),
        source,
        origin: "Bangalore".to_string(),
        destination: "Hyderabad".to_string(),
        departs_at,
        seats: 1 + (i % 4) as u32,
        seat_rate: 1000.0,
        status: BookingStatus::Confirmed,
        notes: Some(format!("Booking number {}", i)),
    })
}

fn scenario() -> Vec<BookingRecord> {
    vec![
        booking(0, Source::Mmt),
        booking(1, Source::Goibibo),
        booking(2, Source::Mmt),
    ]
}

fn test_app(records: Vec<BookingRecord>) -> Router {
    let feed = Arc::new(MockFeed { count: 5, rng_seed: Some(3) });
    app(AppState::new(ViewState::new(records), feed))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Option<String>, Vec<u8>) {
    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, disposition, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = test_app(scenario());
    let (status, _, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_default_listing() {
    let app = test_app(scenario());
    let (status, body) = send_json(&app, Method::GET, "/v1/bookings", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalItems"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["pageSize"], 15);
    assert_eq!(body["exportEnabled"], true);
    assert_eq!(body["filters"]["source"], "all");
    assert_eq!(body["sort"]["key"], "timestamp");
    assert_eq!(body["sort"]["direction"], "descending");
    assert_eq!(body["items"][0]["id"], "BKG-10002");
}

#[tokio::test]
async fn test_source_filter_updates_dashboard() {
    let app = test_app(scenario());
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/v1/filters",
        Some(json!({ "field": "source", "value": "mmt" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalItems"], 2);
    assert_eq!(body["filters"]["source"], "mmt");

    let (_, dashboard) = send_json(&app, Method::GET, "/v1/dashboard", None).await;
    assert_eq!(dashboard["totalBookings"], 2);
    let by_source = dashboard["bookingsBySource"].as_array().unwrap();
    assert_eq!(by_source.len(), 1);
    assert_eq!(by_source[0]["source"], "mmt");
    assert_eq!(by_source[0]["label"], "MakeMyTrip");
    assert_eq!(by_source[0]["count"], 2);

    let (_, cleared) = send_json(&app, Method::DELETE, "/v1/filters", None).await;
    assert_eq!(cleared["totalItems"], 3);
}

#[tokio::test]
async fn test_invalid_filter_is_bad_request() {
    let app = test_app(scenario());
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/v1/filters",
        Some(json!({ "field": "startDate", "value": "yesterday" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("startDate"));

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/v1/filters",
        Some(json!({ "field": "colour", "value": "red" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sort_requests_cycle_direction() {
    let app = test_app(scenario());
    let (_, body) = send_json(&app, Method::POST, "/v1/sort", Some(json!({ "key": "seats" }))).await;
    assert_eq!(body["sort"]["direction"], "ascending");
    assert_eq!(body["items"][0]["seats"], 1);

    let (_, body) = send_json(&app, Method::POST, "/v1/sort", Some(json!({ "key": "seats" }))).await;
    assert_eq!(body["sort"]["direction"], "descending");
    assert_eq!(body["items"][0]["seats"], 3);

    let (status, body) = send_json(&app, Method::POST, "/v1/sort", Some(json!({ "key": "colour" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("colour"));

    let (_, listing) = send_json(&app, Method::GET, "/v1/bookings", None).await;
    assert_eq!(listing["sort"]["key"], "seats");
    assert_eq!(listing["sort"]["direction"], "descending");
}

#[tokio::test]
async fn test_malformed_bodies_answer_with_json_errors() {
    let app = test_app(scenario());

    let (status, body) = send_json(&app, Method::POST, "/v1/page", Some(json!({ "page": "two" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (status, body) = send_json(&app, Method::POST, "/v1/selection", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("id"));

    let (status, body) = send_json(&app, Method::POST, "/v1/filters", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_page_request_is_clamped() {
    let records: Vec<BookingRecord> = (0..75).map(|i| booking(i, Source::MyBus)).collect();
    let app = test_app(records);

    let (_, body) = send_json(&app, Method::POST, "/v1/page", Some(json!({ "page": 6 }))).await;
    assert_eq!(body["totalPages"], 5);
    assert_eq!(body["page"], 5);
    assert_eq!(body["from"], 61);
    assert_eq!(body["to"], 75);

    let (_, body) = send_json(
        &app,
        Method::POST,
        "/v1/filters",
        Some(json!({ "field": "search", "value": "traveller" })),
    )
    .await;
    assert_eq!(body["page"], 1);
}

#[tokio::test]
async fn test_selection_lifecycle() {
    let app = test_app(scenario());

    let (status, detail) = send_json(&app, Method::POST, "/v1/selection", Some(json!({ "id": "BKG-10001" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["passengerName"], "Traveller 2");
    assert_eq!(detail["sourceLabel"], "Goibibo");
    assert_eq!(detail["paymentStatus"], "Paid");
    assert_eq!(detail["notes"], "Booking number 1");

    let (status, detail) = send_json(&app, Method::GET, "/v1/selection", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["id"], "BKG-10001");

    let (status, _) = send_json(&app, Method::DELETE, "/v1/selection", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send_json(&app, Method::GET, "/v1/selection", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, Method::POST, "/v1/selection", Some(json!({ "id": "BKG-1" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_follows_visible_set() {
    let app = test_app(scenario());

    let (status, disposition, bytes) = send(&app, Method::GET, "/v1/bookings/export", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(disposition.as_deref(), Some("attachment; filename=\"bus_bookings_export.csv\""));
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Booking ID,Passenger Name,Source,Origin,Destination,Date,Time,Seats,Fare,Status");
    assert!(lines[1].starts_with("BKG-10002,Traveller 3,MakeMyTrip,Bangalore,Hyderabad,"));

    send_json(
        &app,
        Method::POST,
        "/v1/filters",
        Some(json!({ "field": "search", "value": "nobody" })),
    )
    .await;
    let (status, disposition, bytes) = send(&app, Method::GET, "/v1/bookings/export", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(disposition.is_none());
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_reseed_replaces_collection() {
    let app = test_app(scenario());
    send_json(&app, Method::POST, "/v1/selection", Some(json!({ "id": "BKG-10000" }))).await;

    let (status, body) = send_json(&app, Method::POST, "/v1/reseed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loaded"], 5);

    let (_, listing) = send_json(&app, Method::GET, "/v1/bookings", None).await;
    assert_eq!(listing["totalItems"], 5);
    let (status, _) = send_json(&app, Method::GET, "/v1/selection", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
