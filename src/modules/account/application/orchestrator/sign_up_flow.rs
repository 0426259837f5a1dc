use std::sync::Arc;
use std::time::Duration;

use crate::modules::account::application::ports::outgoing::{Authenticator, Session};
use crate::modules::account::application::use_cases::sign_up::{
    ISignUpUseCase, SignUpError, SignUpOutput, SignUpRequest,
};
use crate::modules::email::application::ports::outgoing::VerificationNotifier;

// ============================================================================
// Sign-up Flow Output
// ============================================================================
#[derive(Debug)]
pub struct SignUpFlowOutput {
    pub account_id: uuid::Uuid,
    pub email: String,
    pub nickname: String,
    pub session: Session,
    pub message: String,
}

// ============================================================================
// Sign-up Flow Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SignUpFlowError {
    #[error("Sign-up failed: {0}")]
    SignUpFailed(#[from] SignUpError),

    #[error("Session establishment failed: {0}")]
    SessionFailed(String),
}

// ============================================================================
// Sign-up Orchestrator
// ============================================================================

#[derive(Clone)]
pub struct SignUpOrchestrator {
    sign_up_use_case: Arc<dyn ISignUpUseCase + Send + Sync>,
    notifier: Arc<dyn VerificationNotifier + Send + Sync>,
    authenticator: Arc<dyn Authenticator + Send + Sync>,
}

impl SignUpOrchestrator {
    pub fn new(
        sign_up_use_case: Arc<dyn ISignUpUseCase + Send + Sync>,
        notifier: Arc<dyn VerificationNotifier + Send + Sync>,
        authenticator: Arc<dyn Authenticator + Send + Sync>,
    ) -> Self {
        Self {
            sign_up_use_case,
            notifier,
            authenticator,
        }
    }

    /// Orchestrates the complete sign-up:
    /// 1. Creates the account with a pending verification token
    /// 2. Sends the verification mail in the background
    /// 3. Establishes a session with the nickname as principal
    pub async fn register(
        &self,
        request: SignUpRequest,
    ) -> Result<SignUpFlowOutput, SignUpFlowError> {
        let created = self.sign_up_use_case.execute(request).await?;

        // Mail delivery is fire-and-forget; a dead SMTP server must not turn
        // a completed sign-up into an error.
        self.spawn_verification_mail(created.clone());

        let session = self
            .authenticator
            .establish_session(created.account_id, &created.nickname)
            .map_err(|e| SignUpFlowError::SessionFailed(e.to_string()))?;

        Ok(SignUpFlowOutput {
            account_id: created.account_id,
            email: created.email,
            nickname: created.nickname,
            session,
            message: "Account created. Please check your email to verify your address."
                .to_string(),
        })
    }

    fn spawn_verification_mail(&self, created: SignUpOutput) {
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            let max_retries = 3;
            for attempt in 1..=max_retries {
                match notifier
                    .send_verification(
                        &created.email,
                        &created.nickname,
                        &created.verification_token,
                    )
                    .await
                {
                    Ok(_) => return,
                    Err(e) if attempt < max_retries => {
                        tracing::warn!(
                            "Verification mail attempt {}/{} failed for account {}: {}. Retrying...",
                            attempt,
                            max_retries,
                            created.account_id,
                            e
                        );
                        tokio::time::sleep(Duration::from_secs(2_u64.pow(attempt))).await;
                    }
                    Err(e) => {
                        tracing::error!(
                            "All {} verification mail attempts failed for account {}: {}",
                            max_retries,
                            created.account_id,
                            e
                        );
                    }
                }
            }
        });
    }
}
