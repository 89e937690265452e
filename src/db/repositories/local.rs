//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap structures, providing fast, deterministic, and
//! isolated execution.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::db::repository::{
    AccountRepository, FlightRepository, RepositoryError, RepositoryResult,
    ReservationRepository,
};
use crate::models::{
    Account, AccountId, Flight, FlightData, FlightId, NewAccount, NewReservation, Reservation,
    ReservationId,
};

/// In-memory local repository.
///
/// Stores all data in HashMaps behind a single `RwLock`, making it ideal for
/// unit tests and local development that need isolation and speed. Cloning
/// yields a handle to the same underlying store.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    flights: HashMap<FlightId, Flight>,
    reservations: HashMap<ReservationId, Reservation>,
    accounts: HashMap<AccountId, Account>,
    // token digest -> owning account
    tokens: HashMap<String, AccountId>,

    // ID counters
    next_flight_id: i64,
    next_reservation_id: i64,
    next_account_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            flights: HashMap::new(),
            reservations: HashMap::new(),
            accounts: HashMap::new(),
            tokens: HashMap::new(),
            next_flight_id: 1,
            next_reservation_id: 1,
            next_account_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write().unwrap();
        data.is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    /// Number of flights stored.
    pub fn flight_count(&self) -> usize {
        self.data.read().unwrap().flights.len()
    }

    /// Check if a flight exists.
    pub fn has_flight(&self, flight_id: FlightId) -> bool {
        self.data.read().unwrap().flights.contains_key(&flight_id)
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        let data = self.data.read().unwrap();
        if !data.is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FlightRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read().unwrap();
        Ok(data.is_healthy)
    }

    async fn list_flights(&self) -> RepositoryResult<Vec<Flight>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut flights: Vec<Flight> = data.flights.values().cloned().collect();
        flights.sort_by_key(|f| f.id);
        Ok(flights)
    }

    async fn get_flight(&self, id: FlightId) -> RepositoryResult<Flight> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.flights
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Flight {} not found", id)))
    }

    async fn create_flight(&self, flight_data: FlightData) -> RepositoryResult<Flight> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        let id = FlightId::new(data.next_flight_id);
        data.next_flight_id += 1;

        let flight = Flight::from_data(id, flight_data);
        data.flights.insert(id, flight.clone());
        Ok(flight)
    }

    async fn update_flight(&self, id: FlightId, flight_data: FlightData) -> RepositoryResult<Flight> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        let flight = data
            .flights
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found(format!("Flight {} not found", id)))?;
        flight.apply(flight_data);
        Ok(flight.clone())
    }

    async fn delete_flight(&self, id: FlightId) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        if data.flights.remove(&id).is_none() {
            return Err(RepositoryError::not_found(format!(
                "Flight {} not found",
                id
            )));
        }
        data.reservations.retain(|_, r| r.flight_id != id);
        Ok(())
    }

    async fn count_flights(&self) -> RepositoryResult<usize> {
        self.check_health()?;
        Ok(self.data.read().unwrap().flights.len())
    }
}

#[async_trait]
impl ReservationRepository for LocalRepository {
    async fn reservations_for_flight(
        &self,
        flight_id: FlightId,
    ) -> RepositoryResult<Vec<Reservation>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        let mut reservations: Vec<Reservation> = data
            .reservations
            .values()
            .filter(|r| r.flight_id == flight_id)
            .cloned()
            .collect();
        reservations.sort_by_key(|r| r.id);
        Ok(reservations)
    }

    async fn create_reservation(&self, input: NewReservation) -> RepositoryResult<Reservation> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        if !data.flights.contains_key(&input.flight_id) {
            return Err(RepositoryError::not_found(format!(
                "Flight {} not found",
                input.flight_id
            )));
        }

        let id = ReservationId::new(data.next_reservation_id);
        data.next_reservation_id += 1;

        let reservation = Reservation {
            id,
            flight_id: input.flight_id,
            passenger_name: input.passenger_name,
            reserved_by: input.reserved_by,
        };
        data.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }
}

#[async_trait]
impl AccountRepository for LocalRepository {
    async fn create_account(&self, input: NewAccount) -> RepositoryResult<Account> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        if data.accounts.values().any(|a| a.username == input.username) {
            return Err(RepositoryError::validation(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        let id = AccountId::new(data.next_account_id);
        data.next_account_id += 1;

        let account = Account {
            id,
            username: input.username,
            email: input.email,
            is_staff: input.is_staff,
            is_active: true,
        };
        data.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: AccountId) -> RepositoryResult<Account> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        data.accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Account {} not found", id)))
    }

    async fn set_staff(&self, id: AccountId, is_staff: bool) -> RepositoryResult<Account> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        let account = data
            .accounts
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found(format!("Account {} not found", id)))?;
        account.is_staff = is_staff;
        Ok(account.clone())
    }

    async fn store_token(&self, account_id: AccountId, token_hash: &str) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        if !data.accounts.contains_key(&account_id) {
            return Err(RepositoryError::not_found(format!(
                "Account {} not found",
                account_id
            )));
        }
        data.tokens.insert(token_hash.to_string(), account_id);
        Ok(())
    }

    async fn account_for_token_hash(
        &self,
        token_hash: &str,
    ) -> RepositoryResult<Option<Account>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .tokens
            .get(token_hash)
            .and_then(|id| data.accounts.get(id))
            .cloned())
    }

    async fn revoke_token(&self, token_hash: &str) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.tokens.remove(token_hash);
        Ok(())
    }
}
