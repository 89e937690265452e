//! Reservation storage operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{FlightId, NewReservation, Reservation};

/// Storage operations for reservations.
///
/// Reservations belong to a flight and are removed with it.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Reservations booked on a flight, ordered by id.
    async fn reservations_for_flight(
        &self,
        flight_id: FlightId,
    ) -> RepositoryResult<Vec<Reservation>>;

    /// Persist a new reservation. `NotFound` if the flight does not exist.
    async fn create_reservation(&self, input: NewReservation) -> RepositoryResult<Reservation>;
}
