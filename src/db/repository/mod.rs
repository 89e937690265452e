//! Repository trait definitions for database operations.
//!
//! This module provides a collection of focused repository traits that
//! abstract storage operations. By splitting responsibilities across
//! multiple traits, implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`flight`]: Core CRUD operations for flight records
//! - [`reservation`]: Reservation storage (staff-only sub-resource)
//! - [`account`]: Accounts and API token digests
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the
//! [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let flight = repo.create_flight(data).await?;
//!     repo.reservations_for_flight(flight.id).await?;
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod error;
pub mod flight;
pub mod reservation;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use account::AccountRepository;
pub use flight::FlightRepository;
pub use reservation::ReservationRepository;

/// Composite trait bound for a complete repository implementation.
///
/// This trait is automatically implemented for any type that implements
/// all three repository traits. Use this as a convenient bound when you
/// need access to all repository operations.
pub trait FullRepository: FlightRepository + ReservationRepository + AccountRepository {}

// Blanket implementation: any type implementing all three traits automatically
// implements FullRepository
impl<T> FullRepository for T where
    T: FlightRepository + ReservationRepository + AccountRepository
{
}
