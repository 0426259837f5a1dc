use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::account::application::domain::entities::{Account, IssuedToken};

/// Which unique column a conflicting write collided on. The store's unique
/// constraints are the authoritative uniqueness guarantee; the sign-up
/// validator's checks are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    Nickname,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountRepositoryError {
    #[error("duplicate {0:?}")]
    Duplicate(DuplicateField),

    #[error("account not found")]
    AccountNotFound,

    #[error("database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create_account(&self, account: Account) -> Result<Account, AccountRepositoryError>;

    /// Overwrite the stored verification token and its issuance timestamp.
    async fn store_verification_token(
        &self,
        account_id: Uuid,
        token: IssuedToken,
    ) -> Result<(), AccountRepositoryError>;

    async fn mark_verified(
        &self,
        account_id: Uuid,
        verified_at: DateTime<Utc>,
    ) -> Result<(), AccountRepositoryError>;
}
