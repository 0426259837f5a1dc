use std::fmt;
use std::sync::Arc;

use crate::modules::email::application::ports::outgoing::{
    EmailSender, NotificationError, VerificationNotifier,
};

/// Builds the confirmation mail and hands it to the configured sender.
/// The link carries both email and token; confirmation needs the pair.
#[derive(Clone)]
pub struct VerificationMailer {
    sender: Arc<dyn EmailSender + Send + Sync>,
    base_url: String,
}

impl fmt::Debug for VerificationMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationMailer")
            .field("sender", &"<dyn EmailSender>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl VerificationMailer {
    pub fn new(sender: Arc<dyn EmailSender + Send + Sync>, base_url: String) -> Self {
        Self { sender, base_url }
    }

    fn confirmation_link(&self, email: &str, token: &str) -> String {
        format!(
            "{}/api/accounts/check-email-token?token={}&email={}",
            self.base_url, token, email
        )
    }
}

#[async_trait::async_trait]
impl VerificationNotifier for VerificationMailer {
    async fn send_verification(
        &self,
        email: &str,
        nickname: &str,
        token: &str,
    ) -> Result<(), NotificationError> {
        let link = self.confirmation_link(email, token);

        let html_body = format!(
            r#"
            <p>Hi {nickname},</p>
            <p>Welcome to StudyHub! Confirm your email address to finish signing up:</p>
            <p>
                <a href="{link}" style="
                    display: inline-block;
                    padding: 10px 20px;
                    background-color: #007BFF;
                    color: white;
                    text-decoration: none;
                    border-radius: 5px;
                ">Confirm Your Email</a>
            </p>
            <p>If the button does not work, paste this link into your browser:</p>
            <p>{link}</p>
            <p>Thanks,<br>The StudyHub Team</p>
            "#
        );

        self.sender
            .send_email(email, "Confirm your StudyHub account", &html_body)
            .await
            .map_err(NotificationError::SendingFailed)
    }
}
