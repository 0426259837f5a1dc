use crate::modules::email::application::ports::outgoing::EmailSender;
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{
    message::header::ContentType, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// Seam between message construction and the actual SMTP transport, so the
/// construction path is testable without a server.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Message) -> Result<(), String>;
}

#[async_trait]
impl Mailer for AsyncSmtpTransport<Tokio1Executor> {
    async fn send(&self, email: Message) -> Result<(), String> {
        AsyncTransport::send(self, email)
            .await
            .map(|_resp| ())
            .map_err(|e| e.to_string())
    }
}

pub struct SmtpEmailSender {
    mailer: Box<dyn Mailer>,
    from_email: String,
}

impl SmtpEmailSender {
    pub fn new_with_mailer(mailer: Box<dyn Mailer>, from_email: &str) -> Self {
        Self {
            mailer,
            from_email: from_email.to_string(),
        }
    }

    pub fn new(
        smtp_server: &str,
        smtp_username: &str,
        smtp_password: &str,
        from_email: &str,
    ) -> Self {
        let creds = Credentials::new(smtp_username.to_string(), smtp_password.to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_server)
            .expect("valid SMTP relay host")
            .credentials(creds)
            .build();

        Self {
            mailer: Box::new(transport),
            from_email: from_email.to_string(),
        }
    }

    // Local/test constructor (Mailpit, MailHog, etc.)
    pub fn new_local(host: &str, port: u16, from_email: &str) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            mailer: Box::new(transport),
            from_email: from_email.to_string(),
        }
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String> {
        let email = Message::builder()
            .from(self.from_email.parse().map_err(|e| format!("{:?}", e))?)
            .to(to.parse().map_err(|e| format!("{:?}", e))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| e.to_string())?;

        self.mailer.send(email).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AcceptingMailer;

    #[async_trait]
    impl Mailer for AcceptingMailer {
        async fn send(&self, _email: Message) -> Result<(), String> {
            Ok(())
        }
    }

    struct UnreachableMailer;

    #[async_trait]
    impl Mailer for UnreachableMailer {
        async fn send(&self, _email: Message) -> Result<(), String> {
            panic!("message construction should have failed before send");
        }
    }

    #[tokio::test]
    async fn builds_and_sends_a_well_formed_message() {
        let sender = SmtpEmailSender::new_with_mailer(Box::new(AcceptingMailer), "noreply@studyhub.dev");

        let result = sender
            .send_email("member@example.com", "Confirm", "<p>hello</p>")
            .await;

        assert!(result.is_ok(), "Expected Ok, got {:?}", result);
    }

    #[tokio::test]
    async fn rejects_invalid_recipient_before_reaching_transport() {
        let sender =
            SmtpEmailSender::new_with_mailer(Box::new(UnreachableMailer), "noreply@studyhub.dev");

        let result = sender.send_email("not-an-address", "Subject", "<p>x</p>").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn rejects_invalid_from_address_before_reaching_transport() {
        let sender = SmtpEmailSender::new_with_mailer(Box::new(UnreachableMailer), "bad-from");

        let result = sender
            .send_email("member@example.com", "Subject", "<p>x</p>")
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        struct FailingMailer;

        #[async_trait]
        impl Mailer for FailingMailer {
            async fn send(&self, _: Message) -> Result<(), String> {
                Err("connection refused".to_string())
            }
        }

        let sender = SmtpEmailSender::new_with_mailer(Box::new(FailingMailer), "noreply@studyhub.dev");

        let result = sender
            .send_email("member@example.com", "Subject", "<p>x</p>")
            .await;

        assert_eq!(result, Err("connection refused".to_string()));
    }
}
