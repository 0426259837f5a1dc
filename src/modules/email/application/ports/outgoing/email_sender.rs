use async_trait::async_trait;

/// Transport-level mail delivery. Implementations own addressing and
/// connection details; callers only provide the message.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String>;
}
