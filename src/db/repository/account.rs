//! Account and token storage operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Account, AccountId, NewAccount};

/// Storage operations for accounts and their API tokens.
///
/// Tokens are stored only as SHA-256 hex digests; the raw value never
/// reaches the repository.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account. `ValidationError` on duplicate username.
    async fn create_account(&self, input: NewAccount) -> RepositoryResult<Account>;

    /// Fetch a single account, `NotFound` for unknown ids.
    async fn get_account(&self, id: AccountId) -> RepositoryResult<Account>;

    /// Grant or revoke the staff flag, returning the updated account.
    async fn set_staff(&self, id: AccountId, is_staff: bool) -> RepositoryResult<Account>;

    /// Associate a token digest with an account.
    async fn store_token(&self, account_id: AccountId, token_hash: &str) -> RepositoryResult<()>;

    /// Resolve a token digest to its owning account, if any.
    async fn account_for_token_hash(
        &self,
        token_hash: &str,
    ) -> RepositoryResult<Option<Account>>;

    /// Remove a token digest. Unknown digests are a no-op.
    async fn revoke_token(&self, token_hash: &str) -> RepositoryResult<()>;
}
