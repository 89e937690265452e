//! # Flight API
//!
//! REST service for managing flight records with token-authenticated,
//! staff-gated write access.
//!
//! Anyone may list flights; only staff accounts may create, update, or
//! delete them. Callers authenticate with an opaque token passed as
//! `Authorization: Token <value>`, resolved server-side to an account
//! carrying the staff flag.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain records (flights, reservations, accounts)
//! - [`auth`]: Token generation, hashing, and header parsing
//! - [`db`]: Repository pattern, storage backends, and the service layer
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod auth;
pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;
