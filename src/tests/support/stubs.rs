use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::account::application::ports::outgoing::{
    Authenticator, Session, SessionClaims, SessionError,
};
use crate::modules::account::application::use_cases::confirm_email::{
    ConfirmEmailError, ConfirmEmailOutput, IConfirmEmailUseCase,
};
use crate::modules::account::application::use_cases::login::{
    ILoginUseCase, LoginError, LoginOutput, LoginRequest,
};
use crate::modules::account::application::use_cases::resend_verification::{
    IResendVerificationUseCase, ResendVerificationError, ResendVerificationOutput,
};
use crate::modules::account::application::use_cases::sign_up::{
    ISignUpUseCase, SignUpError, SignUpOutput, SignUpRequest,
};
use crate::modules::email::application::ports::outgoing::{
    NotificationError, VerificationNotifier,
};

#[derive(Default, Clone)]
pub struct StubSignUpUseCase;

#[async_trait]
impl ISignUpUseCase for StubSignUpUseCase {
    async fn execute(&self, _request: SignUpRequest) -> Result<SignUpOutput, SignUpError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubConfirmEmailUseCase;

#[async_trait]
impl IConfirmEmailUseCase for StubConfirmEmailUseCase {
    async fn execute(
        &self,
        _email: &str,
        _token: &str,
    ) -> Result<ConfirmEmailOutput, ConfirmEmailError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubResendVerificationUseCase;

#[async_trait]
impl IResendVerificationUseCase for StubResendVerificationUseCase {
    async fn execute(
        &self,
        _account_id: Uuid,
    ) -> Result<ResendVerificationOutput, ResendVerificationError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubLoginUseCase;

#[async_trait]
impl ILoginUseCase for StubLoginUseCase {
    async fn execute(&self, _request: LoginRequest) -> Result<LoginOutput, LoginError> {
        unimplemented!("Not used in this test")
    }
}

#[derive(Default, Clone)]
pub struct StubVerificationNotifier;

#[async_trait]
impl VerificationNotifier for StubVerificationNotifier {
    async fn send_verification(
        &self,
        _email: &str,
        _nickname: &str,
        _token: &str,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// Accepts every token and signs sessions with a fixed value.
#[derive(Default, Clone)]
pub struct StubAuthenticator;

impl Authenticator for StubAuthenticator {
    fn establish_session(
        &self,
        _account_id: Uuid,
        nickname: &str,
    ) -> Result<Session, SessionError> {
        Ok(Session {
            token: "stub-session-token".to_string(),
            principal: nickname.to_string(),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
        })
    }

    fn verify_session(&self, _token: &str) -> Result<SessionClaims, SessionError> {
        Ok(SessionClaims {
            account_id: Uuid::new_v4(),
            nickname: "stub".to_string(),
        })
    }
}
