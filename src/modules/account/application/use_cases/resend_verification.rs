use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::modules::account::application::ports::outgoing::{
    AccountQuery, AccountRepository, AccountRepositoryError,
};
use crate::modules::email::application::ports::outgoing::VerificationNotifier;

#[derive(Debug, Clone)]
pub enum ResendVerificationError {
    AccountNotFound,
    /// Less than an hour since the last token was issued.
    CooldownActive,
    DatabaseError(String),
}

#[derive(Debug, Clone)]
pub struct ResendVerificationOutput {
    pub email: String,
    /// False when the mail could not be handed off. The fresh token is
    /// already stored either way, so a later confirm with it still works.
    pub delivered: bool,
}

#[async_trait]
pub trait IResendVerificationUseCase: Send + Sync {
    async fn execute(
        &self,
        account_id: Uuid,
    ) -> Result<ResendVerificationOutput, ResendVerificationError>;
}

pub struct ResendVerificationUseCase<Q, R>
where
    Q: AccountQuery + Send + Sync,
    R: AccountRepository + Send + Sync,
{
    query: Q,
    repository: R,
    notifier: Arc<dyn VerificationNotifier + Send + Sync>,
}

impl<Q, R> ResendVerificationUseCase<Q, R>
where
    Q: AccountQuery + Send + Sync,
    R: AccountRepository + Send + Sync,
{
    pub fn new(
        query: Q,
        repository: R,
        notifier: Arc<dyn VerificationNotifier + Send + Sync>,
    ) -> Self {
        Self {
            query,
            repository,
            notifier,
        }
    }
}

#[async_trait]
impl<Q, R> IResendVerificationUseCase for ResendVerificationUseCase<Q, R>
where
    Q: AccountQuery + Send + Sync,
    R: AccountRepository + Send + Sync,
{
    async fn execute(
        &self,
        account_id: Uuid,
    ) -> Result<ResendVerificationOutput, ResendVerificationError> {
        let mut account = self
            .query
            .find_by_id(account_id)
            .await
            .map_err(|e| ResendVerificationError::DatabaseError(e.to_string()))?
            .ok_or(ResendVerificationError::AccountNotFound)?;

        let now = Utc::now();
        if !account.can_resend(now) {
            return Err(ResendVerificationError::CooldownActive);
        }

        // Persist the fresh token before attempting delivery. The old token
        // stops matching as soon as this write lands.
        let issued = account.issue_verification_token(now);
        self.repository
            .store_verification_token(account.id, issued.clone())
            .await
            .map_err(|e| match e {
                AccountRepositoryError::AccountNotFound => ResendVerificationError::AccountNotFound,
                other => ResendVerificationError::DatabaseError(other.to_string()),
            })?;

        let delivered = match self
            .notifier
            .send_verification(&account.email, &account.nickname, &issued.value)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    account_id = %account.id,
                    "Verification resend delivery failed: {}",
                    e
                );
                false
            }
        };

        Ok(ResendVerificationOutput {
            email: account.email,
            delivered,
        })
    }
}
