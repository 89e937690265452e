//! Data Transfer Objects for the HTTP API.
//!
//! Flights have two representations: the public one shown to anonymous and
//! non-staff callers, and the staff one that additionally nests the
//! reservations booked on each flight. The public body must never contain a
//! `reservations` key.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{Flight, FlightData, Reservation};

/// Request body for creating or fully updating a flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightPayload {
    pub flight_number: String,
    pub operation_airlines: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub date_of_departure: NaiveDate,
    pub estimated_time_departure: NaiveTime,
}

impl From<FlightPayload> for FlightData {
    fn from(payload: FlightPayload) -> Self {
        FlightData {
            flight_number: payload.flight_number,
            operation_airlines: payload.operation_airlines,
            departure_city: payload.departure_city,
            arrival_city: payload.arrival_city,
            date_of_departure: payload.date_of_departure,
            estimated_time_departure: payload.estimated_time_departure,
        }
    }
}

/// Flight representation for anonymous and non-staff callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicFlightDto {
    pub id: i64,
    pub flight_number: String,
    pub operation_airlines: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub date_of_departure: NaiveDate,
    pub estimated_time_departure: NaiveTime,
}

impl From<Flight> for PublicFlightDto {
    fn from(flight: Flight) -> Self {
        Self {
            id: flight.id.value(),
            flight_number: flight.flight_number,
            operation_airlines: flight.operation_airlines,
            departure_city: flight.departure_city,
            arrival_city: flight.arrival_city,
            date_of_departure: flight.date_of_departure,
            estimated_time_departure: flight.estimated_time_departure,
        }
    }
}

/// Reservation as nested inside staff flight representations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationDto {
    pub id: i64,
    pub passenger_name: String,
    pub reserved_by: String,
}

impl From<Reservation> for ReservationDto {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id.value(),
            passenger_name: reservation.passenger_name,
            reserved_by: reservation.reserved_by,
        }
    }
}

/// Flight representation for staff callers, including reservations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffFlightDto {
    pub id: i64,
    pub flight_number: String,
    pub operation_airlines: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub date_of_departure: NaiveDate,
    pub estimated_time_departure: NaiveTime,
    pub reservations: Vec<ReservationDto>,
}

impl StaffFlightDto {
    pub fn new(flight: Flight, reservations: Vec<Reservation>) -> Self {
        Self {
            id: flight.id.value(),
            flight_number: flight.flight_number,
            operation_airlines: flight.operation_airlines,
            departure_city: flight.departure_city,
            arrival_city: flight.arrival_city,
            date_of_departure: flight.date_of_departure,
            estimated_time_departure: flight.estimated_time_departure,
            reservations: reservations.into_iter().map(Into::into).collect(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlightId, ReservationId};

    fn sample_flight() -> Flight {
        Flight {
            id: FlightId::new(1),
            flight_number: "456dfg".to_string(),
            operation_airlines: "THY".to_string(),
            departure_city: "Istanbul".to_string(),
            arrival_city: "London".to_string(),
            date_of_departure: NaiveDate::from_ymd_opt(2023, 1, 7).unwrap(),
            estimated_time_departure: NaiveTime::from_hms_opt(9, 16, 47).unwrap(),
        }
    }

    #[test]
    fn public_dto_has_no_reservations_key() {
        let json = serde_json::to_value(PublicFlightDto::from(sample_flight())).unwrap();
        assert!(json.get("reservations").is_none());
    }

    #[test]
    fn staff_dto_always_has_reservations_key() {
        let json = serde_json::to_value(StaffFlightDto::new(sample_flight(), vec![])).unwrap();
        assert_eq!(json["reservations"], serde_json::json!([]));
    }

    #[test]
    fn staff_dto_nests_reservations() {
        let reservation = Reservation {
            id: ReservationId::new(5),
            flight_id: FlightId::new(1),
            passenger_name: "Jane Doe".to_string(),
            reserved_by: "agent".to_string(),
        };
        let dto = StaffFlightDto::new(sample_flight(), vec![reservation]);
        assert_eq!(dto.reservations.len(), 1);
        assert_eq!(dto.reservations[0].passenger_name, "Jane Doe");
    }
}
