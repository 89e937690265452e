//! Core CRUD operations for flight records.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Flight, FlightData, FlightId};

/// Storage operations for flight records.
///
/// Implementations assign ids; callers never choose them. `update_flight`
/// replaces every writable field of an existing record.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    /// Check if the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All flights, ordered by id.
    async fn list_flights(&self) -> RepositoryResult<Vec<Flight>>;

    /// Fetch a single flight, `NotFound` for unknown ids.
    async fn get_flight(&self, id: FlightId) -> RepositoryResult<Flight>;

    /// Persist a new flight and return it with its assigned id.
    async fn create_flight(&self, data: FlightData) -> RepositoryResult<Flight>;

    /// Replace all writable fields of an existing flight.
    async fn update_flight(&self, id: FlightId, data: FlightData) -> RepositoryResult<Flight>;

    /// Remove a flight and its reservations, `NotFound` for unknown ids.
    async fn delete_flight(&self, id: FlightId) -> RepositoryResult<()>;

    /// Number of stored flights.
    async fn count_flights(&self) -> RepositoryResult<usize>;
}
