//! Opaque API token issuance, hashing, and header parsing.
//!
//! Tokens are random values handed to a client once; only their SHA-256
//! digest is persisted. A request authenticates by presenting the raw value
//! in an `Authorization: Token <value>` header, which is hashed and looked
//! up against the stored digests.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::{Account, AccountId};

/// Authorization header keyword, as in `Authorization: Token abc123`.
pub const TOKEN_SCHEME: &str = "Token";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication credentials were not provided.")]
    MissingCredentials,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("You do not have permission to perform this action.")]
    StaffRequired,
}

/// Generate a cryptographically random opaque API token
/// (32 bytes → base64url-encoded, no padding).
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 hash of a raw token, hex-encoded.
///
/// This is the value stored in the database; raw tokens are never persisted.
pub fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

/// Extract the raw token from an `Authorization` header value.
///
/// Accepts exactly `Token <value>`: the keyword is case-sensitive and the
/// value must be a single non-empty word.
pub fn parse_token_header(value: &str) -> Result<&str, AuthError> {
    let mut parts = value.splitn(2, ' ');
    match (parts.next(), parts.next()) {
        (Some(TOKEN_SCHEME), Some(key)) if !key.is_empty() && !key.contains(' ') => Ok(key),
        _ => Err(AuthError::InvalidToken),
    }
}

/// The resolved caller of a request — a newtype-ish view of an [`Account`]
/// proving the presented token was verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub account_id: AccountId,
    pub username: String,
    pub is_staff: bool,
}

impl Principal {
    /// Gate for write operations.
    pub fn require_staff(&self) -> Result<(), AuthError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(AuthError::StaffRequired)
        }
    }
}

impl From<Account> for Principal {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.id,
            username: account.username,
            is_staff: account.is_staff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_url_safe() {
        let token = generate_token();
        // base64url characters only (A-Z a-z 0-9 - _), no padding.
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        // 32 bytes → 43 base64url chars.
        assert_eq!(token.len(), 43);
    }

    #[test]
    fn token_hash_is_deterministic() {
        let raw = "some-api-token";
        assert_eq!(hash_token(raw), hash_token(raw));
    }

    #[test]
    fn different_tokens_different_hashes() {
        let h1 = hash_token("token-a");
        let h2 = hash_token("token-b");
        assert_ne!(h1, h2);
    }

    #[test]
    fn parses_token_scheme() {
        assert_eq!(parse_token_header("Token abc123"), Ok("abc123"));
    }

    #[test]
    fn rejects_other_schemes_and_malformed_headers() {
        assert!(parse_token_header("Bearer abc123").is_err());
        assert!(parse_token_header("token abc123").is_err());
        assert!(parse_token_header("Token").is_err());
        assert!(parse_token_header("Token ").is_err());
        assert!(parse_token_header("Token a b").is_err());
        assert!(parse_token_header("").is_err());
    }

    #[test]
    fn staff_gate() {
        let staff = Principal {
            account_id: AccountId::new(1),
            username: "admin".to_string(),
            is_staff: true,
        };
        let regular = Principal {
            account_id: AccountId::new(2),
            username: "user".to_string(),
            is_staff: false,
        };
        assert!(staff.require_staff().is_ok());
        assert_eq!(regular.require_staff(), Err(AuthError::StaffRequired));
    }
}
