use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::account::application::ports::outgoing::{
    AccountQuery, AccountRepository, AccountRepositoryError, Authenticator, Session,
};

#[derive(Debug, Clone)]
pub enum ConfirmEmailError {
    AccountNotFound,
    InvalidToken,
    SessionFailed(String),
    DatabaseError(String),
}

#[derive(Debug, Clone)]
pub struct ConfirmEmailOutput {
    pub account_id: Uuid,
    pub nickname: String,
    pub verified_at: DateTime<Utc>,
    pub session: Session,
}

#[async_trait]
pub trait IConfirmEmailUseCase: Send + Sync {
    async fn execute(&self, email: &str, token: &str)
        -> Result<ConfirmEmailOutput, ConfirmEmailError>;
}

pub struct ConfirmEmailUseCase<Q, R>
where
    Q: AccountQuery + Send + Sync,
    R: AccountRepository + Send + Sync,
{
    query: Q,
    repository: R,
    authenticator: Arc<dyn Authenticator + Send + Sync>,
}

impl<Q, R> ConfirmEmailUseCase<Q, R>
where
    Q: AccountQuery + Send + Sync,
    R: AccountRepository + Send + Sync,
{
    pub fn new(query: Q, repository: R, authenticator: Arc<dyn Authenticator + Send + Sync>) -> Self {
        Self {
            query,
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<Q, R> IConfirmEmailUseCase for ConfirmEmailUseCase<Q, R>
where
    Q: AccountQuery + Send + Sync,
    R: AccountRepository + Send + Sync,
{
    async fn execute(
        &self,
        email: &str,
        token: &str,
    ) -> Result<ConfirmEmailOutput, ConfirmEmailError> {
        let account = self
            .query
            .find_by_email(email)
            .await
            .map_err(|e| ConfirmEmailError::DatabaseError(e.to_string()))?
            .ok_or(ConfirmEmailError::AccountNotFound)?;

        // Token comparison first; a verified account with a matching token is
        // treated below as a replayed link, not a failure.
        if !account.token_matches(token) {
            return Err(ConfirmEmailError::InvalidToken);
        }

        let verified_at = match account.verified_at() {
            // Replayed confirmation link: succeed without touching the store.
            Some(at) => at,
            None => {
                let now = Utc::now();
                self.repository
                    .mark_verified(account.id, now)
                    .await
                    .map_err(|e| match e {
                        AccountRepositoryError::AccountNotFound => {
                            ConfirmEmailError::AccountNotFound
                        }
                        other => ConfirmEmailError::DatabaseError(other.to_string()),
                    })?;
                now
            }
        };

        // Confirmation doubles as login: the caller walks away with a live
        // session whose principal is the nickname.
        let session = self
            .authenticator
            .establish_session(account.id, &account.nickname)
            .map_err(|e| ConfirmEmailError::SessionFailed(e.to_string()))?;

        Ok(ConfirmEmailOutput {
            account_id: account.id,
            nickname: account.nickname,
            verified_at,
            session,
        })
    }
}
