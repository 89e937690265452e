//! High-level database service layer.
//!
//! This module provides repository-agnostic operations that work with any
//! implementation of the repository traits. Business logic that must stay
//! consistent regardless of the storage backend lives here: token hashing,
//! active-account checks, and flight/reservation orchestration.
//!
//! # Usage
//!
//! ```no_run
//! use flight_api::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!
//!     let flights = services::list_flights(&repo).await?;
//!     println!("Found {} flights", flights.len());
//!
//!     Ok(())
//! }
//! ```

use log::{info, warn};

use super::repository::{FullRepository, RepositoryResult};
use crate::auth;
use crate::models::{
    Account, AccountId, Flight, FlightData, FlightId, NewAccount, NewReservation, Reservation,
};

// ==================== Health & Connection ====================

/// Check if the storage backend is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Flight Operations ====================

/// All flights, ordered by id.
pub async fn list_flights<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Flight>> {
    repo.list_flights().await
}

/// All flights together with their reservations, for staff representations.
pub async fn list_flights_with_reservations<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<(Flight, Vec<Reservation>)>> {
    let flights = repo.list_flights().await?;
    let mut out = Vec::with_capacity(flights.len());
    for flight in flights {
        let reservations = repo.reservations_for_flight(flight.id).await?;
        out.push((flight, reservations));
    }
    Ok(out)
}

/// Fetch a single flight.
pub async fn get_flight<R: FullRepository + ?Sized>(
    repo: &R,
    id: FlightId,
) -> RepositoryResult<Flight> {
    repo.get_flight(id).await
}

/// Create a new flight record.
pub async fn create_flight<R: FullRepository + ?Sized>(
    repo: &R,
    data: FlightData,
) -> RepositoryResult<Flight> {
    let flight = repo.create_flight(data).await?;
    info!("Service layer: created flight {} ({})", flight.id, flight);
    Ok(flight)
}

/// Replace all writable fields of an existing flight.
pub async fn update_flight<R: FullRepository + ?Sized>(
    repo: &R,
    id: FlightId,
    data: FlightData,
) -> RepositoryResult<Flight> {
    let flight = repo.update_flight(id, data).await?;
    info!("Service layer: updated flight {} ({})", flight.id, flight);
    Ok(flight)
}

/// Delete a flight and its reservations.
pub async fn delete_flight<R: FullRepository + ?Sized>(
    repo: &R,
    id: FlightId,
) -> RepositoryResult<()> {
    repo.delete_flight(id).await?;
    info!("Service layer: deleted flight {}", id);
    Ok(())
}

/// Number of stored flights.
pub async fn count_flights<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<usize> {
    repo.count_flights().await
}

// ==================== Reservation Operations ====================

/// Book a seat on a flight.
pub async fn create_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    input: NewReservation,
) -> RepositoryResult<Reservation> {
    let reservation = repo.create_reservation(input).await?;
    info!(
        "Service layer: reservation {} for flight {} ({})",
        reservation.id, reservation.flight_id, reservation.passenger_name
    );
    Ok(reservation)
}

// ==================== Account & Token Operations ====================

/// Create an account.
pub async fn create_account<R: FullRepository + ?Sized>(
    repo: &R,
    input: NewAccount,
) -> RepositoryResult<Account> {
    let account = repo.create_account(input).await?;
    info!(
        "Service layer: created account {} ('{}', staff={})",
        account.id, account.username, account.is_staff
    );
    Ok(account)
}

/// Issue a fresh API token for an account.
///
/// The raw token is returned exactly once; only its SHA-256 digest is
/// persisted. The account must exist.
pub async fn issue_token<R: FullRepository + ?Sized>(
    repo: &R,
    account_id: AccountId,
) -> RepositoryResult<String> {
    // Fail early with NotFound rather than storing an orphan digest.
    let account = repo.get_account(account_id).await?;

    let raw = auth::generate_token();
    repo.store_token(account.id, &auth::hash_token(&raw)).await?;
    info!("Service layer: issued token for account {}", account.id);
    Ok(raw)
}

/// Revoke a previously issued raw token. Unknown tokens are a no-op.
pub async fn revoke_token<R: FullRepository + ?Sized>(
    repo: &R,
    raw_token: &str,
) -> RepositoryResult<()> {
    repo.revoke_token(&auth::hash_token(raw_token)).await
}

/// Resolve a raw token to its account.
///
/// Returns `None` for unknown tokens and for inactive accounts; callers
/// treat both as failed authentication.
pub async fn authenticate<R: FullRepository + ?Sized>(
    repo: &R,
    raw_token: &str,
) -> RepositoryResult<Option<Account>> {
    let account = repo
        .account_for_token_hash(&auth::hash_token(raw_token))
        .await?;

    match account {
        Some(account) if account.is_active => Ok(Some(account)),
        Some(account) => {
            warn!(
                "Service layer: token presented for inactive account {}",
                account.id
            );
            Ok(None)
        }
        None => Ok(None),
    }
}
