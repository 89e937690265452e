//! Account domain model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl AccountId {
    pub fn new(value: i64) -> Self {
        AccountId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A principal that can authenticate against the API.
///
/// `is_staff` gates write operations on flights; `is_active` gates
/// authentication altogether.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
}

/// Input for creating an account.
///
/// New accounts are active; staff status defaults to false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_staff: bool,
}
