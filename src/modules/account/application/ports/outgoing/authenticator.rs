use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An established session. The principal identity is the account's nickname,
/// which is what callers observe as "authenticated as".
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub principal: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub account_id: Uuid,
    pub nickname: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("session token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("session expired")]
    SessionExpired,

    #[error("invalid session token")]
    InvalidSession,
}

/// Boundary to the surrounding app's session machinery. Keeps the filter
/// chain / cookie transport out of the verification state machine.
pub trait Authenticator: Send + Sync {
    fn establish_session(&self, account_id: Uuid, nickname: &str)
        -> Result<Session, SessionError>;

    fn verify_session(&self, token: &str) -> Result<SessionClaims, SessionError>;
}
