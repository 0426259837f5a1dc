#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Email sending failed: {0}")]
    SendingFailed(String),
}

/// Delivers a verification token to an account's inbox. Delivery failure is
/// reported to the caller but never invalidates the token that triggered it.
#[async_trait::async_trait]
pub trait VerificationNotifier: Send + Sync {
    async fn send_verification(
        &self,
        email: &str,
        nickname: &str,
        token: &str,
    ) -> Result<(), NotificationError>;
}
