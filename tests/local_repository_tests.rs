//! Repository-level tests against the in-memory backend.

#![cfg(feature = "local-repo")]

use chrono::{NaiveDate, NaiveTime};

use flight_api::auth;
use flight_api::db::repositories::LocalRepository;
use flight_api::db::repository::{
    AccountRepository, FlightRepository, RepositoryError, ReservationRepository,
};
use flight_api::db::services;
use flight_api::models::{FlightData, FlightId, NewAccount, NewReservation};

fn sample_flight(number: &str, arrival: &str) -> FlightData {
    FlightData {
        flight_number: number.to_string(),
        operation_airlines: "THY".to_string(),
        departure_city: "Istanbul".to_string(),
        arrival_city: arrival.to_string(),
        date_of_departure: NaiveDate::from_ymd_opt(2023, 1, 7).unwrap(),
        estimated_time_departure: NaiveTime::from_hms_opt(9, 16, 47).unwrap(),
    }
}

// =============================================================================
// Flight CRUD
// =============================================================================

#[tokio::test]
async fn create_assigns_sequential_ids() {
    let repo = LocalRepository::new();

    let first = repo.create_flight(sample_flight("AA1", "London")).await.unwrap();
    let second = repo.create_flight(sample_flight("AA2", "Berlin")).await.unwrap();

    assert_eq!(first.id, FlightId::new(1));
    assert_eq!(second.id, FlightId::new(2));
    assert_eq!(repo.count_flights().await.unwrap(), 2);
}

#[tokio::test]
async fn list_returns_flights_in_id_order() {
    let repo = LocalRepository::new();
    repo.create_flight(sample_flight("AA1", "London")).await.unwrap();
    repo.create_flight(sample_flight("AA2", "Berlin")).await.unwrap();
    repo.create_flight(sample_flight("AA3", "Paris")).await.unwrap();

    let flights = repo.list_flights().await.unwrap();
    let numbers: Vec<&str> = flights.iter().map(|f| f.flight_number.as_str()).collect();
    assert_eq!(numbers, vec!["AA1", "AA2", "AA3"]);
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_id() {
    let repo = LocalRepository::new();
    let flight = repo.create_flight(sample_flight("AA1", "London")).await.unwrap();

    let updated = repo
        .update_flight(flight.id, sample_flight("BB9", "Berlin"))
        .await
        .unwrap();

    assert_eq!(updated.id, flight.id);
    assert_eq!(updated.flight_number, "BB9");
    assert_eq!(updated.arrival_city, "Berlin");
}

#[tokio::test]
async fn get_and_update_unknown_flight_are_not_found() {
    let repo = LocalRepository::new();

    let get_err = repo.get_flight(FlightId::new(42)).await.unwrap_err();
    assert!(matches!(get_err, RepositoryError::NotFound { .. }));

    let update_err = repo
        .update_flight(FlightId::new(42), sample_flight("AA1", "London"))
        .await
        .unwrap_err();
    assert!(matches!(update_err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn delete_removes_flight_and_reservations() {
    let repo = LocalRepository::new();
    let flight = repo.create_flight(sample_flight("AA1", "London")).await.unwrap();
    repo.create_reservation(NewReservation {
        flight_id: flight.id,
        passenger_name: "Jane Doe".to_string(),
        reserved_by: "admin".to_string(),
    })
    .await
    .unwrap();

    repo.delete_flight(flight.id).await.unwrap();

    assert_eq!(repo.count_flights().await.unwrap(), 0);
    let reservations = repo.reservations_for_flight(flight.id).await.unwrap();
    assert!(reservations.is_empty());
}

#[tokio::test]
async fn delete_unknown_flight_is_not_found() {
    let repo = LocalRepository::new();
    let err = repo.delete_flight(FlightId::new(1)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn reservation_requires_existing_flight() {
    let repo = LocalRepository::new();
    let err = repo
        .create_reservation(NewReservation {
            flight_id: FlightId::new(7),
            passenger_name: "Jane Doe".to_string(),
            reserved_by: "admin".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

// =============================================================================
// Accounts & tokens
// =============================================================================

#[tokio::test]
async fn duplicate_usernames_are_rejected() {
    let repo = LocalRepository::new();
    let input = NewAccount {
        username: "admin".to_string(),
        email: "a@a.com".to_string(),
        is_staff: false,
    };

    repo.create_account(input.clone()).await.unwrap();
    let err = repo.create_account(input).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn issued_token_authenticates_its_account() {
    let repo = LocalRepository::new();
    let account = services::create_account(
        &repo,
        NewAccount {
            username: "admin".to_string(),
            email: "a@a.com".to_string(),
            is_staff: true,
        },
    )
    .await
    .unwrap();

    let token = services::issue_token(&repo, account.id).await.unwrap();
    let resolved = services::authenticate(&repo, &token).await.unwrap();

    let resolved = resolved.expect("token should resolve");
    assert_eq!(resolved.id, account.id);
    assert!(resolved.is_staff);
}

#[tokio::test]
async fn unknown_token_does_not_authenticate() {
    let repo = LocalRepository::new();
    let resolved = services::authenticate(&repo, "not-a-real-token").await.unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn revoked_token_no_longer_authenticates() {
    let repo = LocalRepository::new();
    let account = services::create_account(
        &repo,
        NewAccount {
            username: "admin".to_string(),
            email: "a@a.com".to_string(),
            is_staff: false,
        },
    )
    .await
    .unwrap();

    let token = services::issue_token(&repo, account.id).await.unwrap();
    services::revoke_token(&repo, &token).await.unwrap();

    let resolved = services::authenticate(&repo, &token).await.unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn set_staff_promotes_an_account() {
    let repo = LocalRepository::new();
    let account = repo
        .create_account(NewAccount {
            username: "user".to_string(),
            email: "u@u.com".to_string(),
            is_staff: false,
        })
        .await
        .unwrap();
    assert!(!account.is_staff);

    let promoted = repo.set_staff(account.id, true).await.unwrap();
    assert!(promoted.is_staff);
}

#[tokio::test]
async fn only_the_token_digest_is_stored() {
    let repo = LocalRepository::new();
    let account = repo
        .create_account(NewAccount {
            username: "admin".to_string(),
            email: "a@a.com".to_string(),
            is_staff: false,
        })
        .await
        .unwrap();

    let token = services::issue_token(&repo, account.id).await.unwrap();

    // Raw tokens must not work as lookup keys; only their digest does.
    assert!(repo
        .account_for_token_hash(&token)
        .await
        .unwrap()
        .is_none());
    assert!(repo
        .account_for_token_hash(&auth::hash_token(&token))
        .await
        .unwrap()
        .is_some());
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn unhealthy_repository_fails_operations() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    assert!(!repo.health_check().await.unwrap());
    let err = repo.list_flights().await.unwrap_err();
    assert!(matches!(err, RepositoryError::ConnectionError { .. }));

    repo.set_healthy(true);
    assert!(repo.health_check().await.unwrap());
    assert!(repo.list_flights().await.is_ok());
}

#[tokio::test]
async fn clear_resets_data_and_id_counters() {
    let repo = LocalRepository::new();
    repo.create_flight(sample_flight("AA1", "London")).await.unwrap();
    repo.clear();

    assert_eq!(repo.count_flights().await.unwrap(), 0);
    let flight = repo.create_flight(sample_flight("AA2", "Berlin")).await.unwrap();
    assert_eq!(flight.id, FlightId::new(1));
}
