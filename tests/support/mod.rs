use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use chrono::{Days, Local, NaiveTime};
use serde_json::Value;
use tower::ServiceExt;

use flight_api::db::repositories::LocalRepository;
use flight_api::db::services;
use flight_api::http::{create_router, AppState};
use flight_api::models::{Account, Flight, FlightData, NewAccount, NewReservation};

/// Build a router backed by a fresh in-memory repository, returning a handle
/// to the same store for seeding and assertions.
pub fn test_app() -> (Router, LocalRepository) {
    let repo = LocalRepository::new();
    let state = AppState::new(Arc::new(repo.clone()));
    (create_router(state), repo)
}

/// A flight departing at this very moment — visible to staff, but already
/// outside the upcoming window shown to everyone else.
pub fn flight_departing_now() -> FlightData {
    let now = Local::now().naive_local();
    FlightData {
        flight_number: "456dfg".to_string(),
        operation_airlines: "THY".to_string(),
        departure_city: "Istanbul".to_string(),
        arrival_city: "London".to_string(),
        date_of_departure: now.date(),
        estimated_time_departure: now.time(),
    }
}

/// A flight departing tomorrow, visible in every listing.
pub fn flight_departing_tomorrow() -> FlightData {
    let tomorrow = Local::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap();
    FlightData {
        flight_number: "789xyz".to_string(),
        operation_airlines: "THY".to_string(),
        departure_city: "Istanbul".to_string(),
        arrival_city: "Berlin".to_string(),
        date_of_departure: tomorrow,
        estimated_time_departure: NaiveTime::from_hms_opt(9, 16, 47).unwrap(),
    }
}

/// The payload used by the write-path tests.
pub fn valid_payload() -> Value {
    serde_json::json!({
        "flight_number": "456df456",
        "operation_airlines": "THY",
        "departure_city": "Istanbul",
        "arrival_city": "Berlin",
        "date_of_departure": "2023-01-07",
        "estimated_time_departure": "09:16:47"
    })
}

pub async fn seed_flight(repo: &LocalRepository, data: FlightData) -> Flight {
    services::create_flight(repo, data).await.unwrap()
}

pub async fn seed_reservation(repo: &LocalRepository, flight: &Flight, passenger: &str) {
    services::create_reservation(
        repo,
        NewReservation {
            flight_id: flight.id,
            passenger_name: passenger.to_string(),
            reserved_by: "admin".to_string(),
        },
    )
    .await
    .unwrap();
}

/// Create an account and issue it a token, returning both.
pub async fn account_with_token(
    repo: &LocalRepository,
    username: &str,
    is_staff: bool,
) -> (Account, String) {
    let account = services::create_account(
        repo,
        NewAccount {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            is_staff,
        },
    )
    .await
    .unwrap();
    let token = services::issue_token(repo, account.id).await.unwrap();
    (account, token)
}

/// Build a request, optionally with a `Token` credential and a JSON body.
pub fn build_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Drive a request through the router without a network socket.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Collect a response body as a UTF-8 string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Convenience: issue a request and return status + body text.
pub async fn send_for_status(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = send(app, request).await;
    let status = response.status();
    let body = body_string(response).await;
    (status, body)
}
