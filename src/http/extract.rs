//! Request extractors for authentication and authorization.
//!
//! Authentication resolves the `Authorization: Token <value>` header against
//! the repository. Extractors run before the request body is touched, so a
//! rejected caller gets 401/403 even when the body would not parse.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use super::error::AppError;
use super::state::AppState;
use crate::auth::{self, AuthError, Principal};
use crate::db::services;
use crate::models::Account;

/// Resolve the request's credentials, if any.
///
/// `Ok(None)` means no credentials were presented. Presented-but-invalid
/// credentials are an error: a bad token fails the request even on
/// endpoints that allow anonymous access.
async fn authenticated_account(
    parts: &Parts,
    state: &AppState,
) -> Result<Option<Account>, AppError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    let raw = auth::parse_token_header(value)?;

    let account = services::authenticate(state.repository.as_ref(), raw).await?;
    match account {
        Some(account) => Ok(Some(account)),
        None => Err(AuthError::InvalidToken.into()),
    }
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let account = authenticated_account(parts, state)
            .await?
            .ok_or(AuthError::MissingCredentials)?;
        Ok(Principal::from(account))
    }
}

/// The caller when authentication is optional: `None` for anonymous requests.
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<Principal>);

impl FromRequestParts<AppState> for MaybePrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let account = authenticated_account(parts, state).await?;
        Ok(MaybePrincipal(account.map(Principal::from)))
    }
}

/// A caller proven to be staff.
///
/// Rejects with 401 for missing/invalid credentials and 403 for
/// authenticated non-staff callers, before any body extractor runs.
#[derive(Debug, Clone)]
pub struct StaffPrincipal(pub Principal);

impl FromRequestParts<AppState> for StaffPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        principal.require_staff()?;
        Ok(StaffPrincipal(principal))
    }
}
