//! Reservation domain model.
//!
//! Reservations are a restricted sub-resource: they appear nested inside
//! flight representations for staff callers only.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::flight::FlightId;

/// Reservation identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub i64);

impl ReservationId {
    pub fn new(value: i64) -> Self {
        ReservationId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A seat booked on a flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub flight_id: FlightId,
    pub passenger_name: String,
    /// Username of the account that made the booking.
    pub reserved_by: String,
}

/// Input for creating a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    pub flight_id: FlightId,
    pub passenger_name: String,
    pub reserved_by: String,
}
