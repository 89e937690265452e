//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. Write handlers take [`StaffPrincipal`]
//! ahead of the JSON body so authorization is settled before the payload is
//! parsed.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;

use super::dto::{FlightPayload, HealthResponse, PublicFlightDto, StaffFlightDto};
use super::error::AppError;
use super::extract::{MaybePrincipal, StaffPrincipal};
use super::state::AppState;
use crate::db::repository::ReservationRepository;
use crate::db::services;
use crate::models::FlightId;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Flight CRUD
// =============================================================================

/// GET /flight/flights/
///
/// List flights. Staff callers see every flight with nested reservations;
/// anonymous and non-staff callers see only upcoming flights without
/// reservation data.
pub async fn list_flights(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
) -> Result<Response, AppError> {
    let is_staff = principal.map(|p| p.is_staff).unwrap_or(false);

    if is_staff {
        let flights =
            services::list_flights_with_reservations(state.repository.as_ref()).await?;
        let dtos: Vec<StaffFlightDto> = flights
            .into_iter()
            .map(|(flight, reservations)| StaffFlightDto::new(flight, reservations))
            .collect();
        return Ok(Json(dtos).into_response());
    }

    let now = Local::now().naive_local();
    let flights = services::list_flights(state.repository.as_ref()).await?;
    let dtos: Vec<PublicFlightDto> = flights
        .into_iter()
        .filter(|f| f.is_upcoming(now))
        .map(Into::into)
        .collect();
    Ok(Json(dtos).into_response())
}

/// POST /flight/flights/
///
/// Create a flight. Staff only.
pub async fn create_flight(
    State(state): State<AppState>,
    StaffPrincipal(_principal): StaffPrincipal,
    Json(payload): Json<FlightPayload>,
) -> Result<(StatusCode, Json<StaffFlightDto>), AppError> {
    let flight = services::create_flight(state.repository.as_ref(), payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(StaffFlightDto::new(flight, vec![])),
    ))
}

/// PUT /flight/flights/{id}/
///
/// Replace all writable fields of a flight. Staff only.
pub async fn update_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    StaffPrincipal(_principal): StaffPrincipal,
    Json(payload): Json<FlightPayload>,
) -> HandlerResult<StaffFlightDto> {
    let id = FlightId::new(id);
    let flight = services::update_flight(state.repository.as_ref(), id, payload.into()).await?;
    let reservations = state.repository.reservations_for_flight(id).await?;
    Ok(Json(StaffFlightDto::new(flight, reservations)))
}

/// DELETE /flight/flights/{id}/
///
/// Delete a flight and its reservations. Staff only.
pub async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    StaffPrincipal(_principal): StaffPrincipal,
) -> Result<StatusCode, AppError> {
    services::delete_flight(state.repository.as_ref(), FlightId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
