//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres database.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    AccountRepository, ErrorContext, FlightRepository, RepositoryError, RepositoryResult,
    ReservationRepository,
};
use crate::models::{
    Account, AccountId, Flight, FlightData, FlightId, NewAccount, NewReservation, Reservation,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
///
/// This repository implementation provides:
/// - Connection pooling with configurable limits
/// - Automatic retry for transient failures
/// - Health monitoring and statistics
/// - Automatic schema migrations
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Current pool statistics.
    pub fn pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Runs the blocking Diesel call on the tokio blocking pool and retries
    /// up to `max_retries` times when a retryable error occurs (connection
    /// errors, serialization failures), doubling the delay each attempt.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: Fn(&mut PgConnection) -> RepositoryResult<T> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let mut attempt: u32 = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            self.total_queries.fetch_add(1, Ordering::Relaxed);

            let pool = self.pool.clone();
            let op = Arc::clone(&f);
            let result = task::spawn_blocking(move || {
                let mut conn = pool.get().map_err(RepositoryError::from)?;
                op(&mut conn)
            })
            .await
            .map_err(|e| {
                RepositoryError::internal(format!("Blocking task join error: {}", e))
            })?;

            match result {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    self.failed_queries.fetch_add(1, Ordering::Relaxed);
                    self.retried_operations.fetch_add(1, Ordering::Relaxed);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    self.failed_queries.fetch_add(1, Ordering::Relaxed);
                    return Err(e.with_operation(operation));
                }
            }
        }
    }
}

#[async_trait]
impl FlightRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let result = self
            .with_conn("health_check", |conn| {
                sql_query("SELECT 1").execute(conn)?;
                Ok(())
            })
            .await;
        Ok(result.is_ok())
    }

    async fn list_flights(&self) -> RepositoryResult<Vec<Flight>> {
        self.with_conn("list_flights", |conn| {
            let rows = flights::table
                .order(flights::id.asc())
                .load::<FlightRow>(conn)?;
            Ok(rows.into_iter().map(Flight::from).collect())
        })
        .await
    }

    async fn get_flight(&self, id: FlightId) -> RepositoryResult<Flight> {
        self.with_conn("get_flight", move |conn| {
            flights::table
                .find(id.value())
                .first::<FlightRow>(conn)
                .optional()?
                .map(Flight::from)
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        format!("Flight {} not found", id),
                        ErrorContext::default()
                            .with_entity("flight")
                            .with_entity_id(id),
                    )
                })
        })
        .await
    }

    async fn create_flight(&self, data: FlightData) -> RepositoryResult<Flight> {
        self.with_conn("create_flight", move |conn| {
            let row: FlightRow = diesel::insert_into(flights::table)
                .values(FlightChangeset::from(&data))
                .get_result(conn)?;
            Ok(Flight::from(row))
        })
        .await
    }

    async fn update_flight(&self, id: FlightId, data: FlightData) -> RepositoryResult<Flight> {
        self.with_conn("update_flight", move |conn| {
            diesel::update(flights::table.find(id.value()))
                .set(FlightChangeset::from(&data))
                .get_result::<FlightRow>(conn)
                .optional()?
                .map(Flight::from)
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        format!("Flight {} not found", id),
                        ErrorContext::default()
                            .with_entity("flight")
                            .with_entity_id(id),
                    )
                })
        })
        .await
    }

    async fn delete_flight(&self, id: FlightId) -> RepositoryResult<()> {
        self.with_conn("delete_flight", move |conn| {
            // Reservations go with the flight via ON DELETE CASCADE.
            let deleted = diesel::delete(flights::table.find(id.value())).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("Flight {} not found", id),
                    ErrorContext::default()
                        .with_entity("flight")
                        .with_entity_id(id),
                ));
            }
            Ok(())
        })
        .await
    }

    async fn count_flights(&self) -> RepositoryResult<usize> {
        self.with_conn("count_flights", |conn| {
            let count: i64 = flights::table.count().get_result(conn)?;
            Ok(count as usize)
        })
        .await
    }
}

#[async_trait]
impl ReservationRepository for PostgresRepository {
    async fn reservations_for_flight(
        &self,
        flight_id: FlightId,
    ) -> RepositoryResult<Vec<Reservation>> {
        self.with_conn("reservations_for_flight", move |conn| {
            let rows = reservations::table
                .filter(reservations::flight_id.eq(flight_id.value()))
                .order(reservations::id.asc())
                .load::<ReservationRow>(conn)?;
            Ok(rows.into_iter().map(Reservation::from).collect())
        })
        .await
    }

    async fn create_reservation(&self, input: NewReservation) -> RepositoryResult<Reservation> {
        self.with_conn("create_reservation", move |conn| {
            let flight_exists: bool = diesel::select(diesel::dsl::exists(
                flights::table.find(input.flight_id.value()),
            ))
            .get_result(conn)?;
            if !flight_exists {
                return Err(RepositoryError::not_found_with_context(
                    format!("Flight {} not found", input.flight_id),
                    ErrorContext::default()
                        .with_entity("flight")
                        .with_entity_id(input.flight_id),
                ));
            }

            let row: ReservationRow = diesel::insert_into(reservations::table)
                .values(NewReservationRow::from(&input))
                .get_result(conn)?;
            Ok(Reservation::from(row))
        })
        .await
    }
}

#[async_trait]
impl AccountRepository for PostgresRepository {
    async fn create_account(&self, input: NewAccount) -> RepositoryResult<Account> {
        self.with_conn("create_account", move |conn| {
            let row: AccountRow = diesel::insert_into(accounts::table)
                .values(NewAccountRow::from(&input))
                .get_result(conn)
                .map_err(|e| match e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        _,
                    ) => RepositoryError::validation(format!(
                        "Username '{}' is already taken",
                        input.username
                    )),
                    other => RepositoryError::from(other),
                })?;
            Ok(Account::from(row))
        })
        .await
    }

    async fn get_account(&self, id: AccountId) -> RepositoryResult<Account> {
        self.with_conn("get_account", move |conn| {
            accounts::table
                .find(id.value())
                .first::<AccountRow>(conn)
                .optional()?
                .map(Account::from)
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        format!("Account {} not found", id),
                        ErrorContext::default()
                            .with_entity("account")
                            .with_entity_id(id),
                    )
                })
        })
        .await
    }

    async fn set_staff(&self, id: AccountId, is_staff: bool) -> RepositoryResult<Account> {
        self.with_conn("set_staff", move |conn| {
            diesel::update(accounts::table.find(id.value()))
                .set(accounts::is_staff.eq(is_staff))
                .get_result::<AccountRow>(conn)
                .optional()?
                .map(Account::from)
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        format!("Account {} not found", id),
                        ErrorContext::default()
                            .with_entity("account")
                            .with_entity_id(id),
                    )
                })
        })
        .await
    }

    async fn store_token(&self, account_id: AccountId, token_hash: &str) -> RepositoryResult<()> {
        let token_hash = token_hash.to_string();
        self.with_conn("store_token", move |conn| {
            diesel::insert_into(auth_tokens::table)
                .values(NewTokenRow {
                    token_hash: &token_hash,
                    account_id: account_id.value(),
                })
                .execute(conn)
                .map_err(|e| match e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                        _,
                    ) => RepositoryError::not_found_with_context(
                        format!("Account {} not found", account_id),
                        ErrorContext::default()
                            .with_entity("account")
                            .with_entity_id(account_id),
                    ),
                    other => RepositoryError::from(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn account_for_token_hash(
        &self,
        token_hash: &str,
    ) -> RepositoryResult<Option<Account>> {
        let token_hash = token_hash.to_string();
        self.with_conn("account_for_token_hash", move |conn| {
            let account = auth_tokens::table
                .inner_join(accounts::table)
                .filter(auth_tokens::token_hash.eq(&token_hash))
                .select(AccountRow::as_select())
                .first::<AccountRow>(conn)
                .optional()?;
            Ok(account.map(Account::from))
        })
        .await
    }

    async fn revoke_token(&self, token_hash: &str) -> RepositoryResult<()> {
        let token_hash = token_hash.to_string();
        self.with_conn("revoke_token", move |conn| {
            diesel::delete(auth_tokens::table.filter(auth_tokens::token_hash.eq(&token_hash)))
                .execute(conn)?;
            Ok(())
        })
        .await
    }
}
