use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::account::application::domain::entities::Account;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AccountQueryError {
    #[error("database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait AccountQuery: Send + Sync {
    async fn find_by_id(&self, account_id: Uuid) -> Result<Option<Account>, AccountQueryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountQueryError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, AccountQueryError>;
    async fn exists_by_nickname(&self, nickname: &str) -> Result<bool, AccountQueryError>;
}
