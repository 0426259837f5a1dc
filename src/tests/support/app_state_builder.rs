use crate::modules::account::application::orchestrator::sign_up_flow::SignUpOrchestrator;
use crate::modules::account::application::use_cases::confirm_email::IConfirmEmailUseCase;
use crate::modules::account::application::use_cases::login::ILoginUseCase;
use crate::modules::account::application::use_cases::resend_verification::IResendVerificationUseCase;
use crate::tests::support::stubs::*;
use crate::AppState;
use actix_web::web;
use std::sync::Arc;

pub struct TestAppStateBuilder {
    sign_up: Option<Arc<SignUpOrchestrator>>,
    confirm_email: Option<Arc<dyn IConfirmEmailUseCase + Send + Sync>>,
    resend_verification: Option<Arc<dyn IResendVerificationUseCase + Send + Sync>>,
    login: Option<Arc<dyn ILoginUseCase + Send + Sync>>,
}

pub fn default_test_sign_up_orchestrator() -> Arc<SignUpOrchestrator> {
    Arc::new(SignUpOrchestrator::new(
        Arc::new(StubSignUpUseCase),
        Arc::new(StubVerificationNotifier),
        Arc::new(StubAuthenticator),
    ))
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            sign_up: Some(default_test_sign_up_orchestrator()),
            confirm_email: Some(Arc::new(StubConfirmEmailUseCase)),
            resend_verification: Some(Arc::new(StubResendVerificationUseCase)),
            login: Some(Arc::new(StubLoginUseCase)),
        }
    }
}

impl TestAppStateBuilder {
    pub fn with_sign_up_orchestrator(mut self, orchestrator: Arc<SignUpOrchestrator>) -> Self {
        self.sign_up = Some(orchestrator);
        self
    }

    pub fn with_confirm_email(
        mut self,
        uc: impl IConfirmEmailUseCase + Send + Sync + 'static,
    ) -> Self {
        self.confirm_email = Some(Arc::new(uc));
        self
    }

    pub fn with_resend_verification(
        mut self,
        uc: impl IResendVerificationUseCase + Send + Sync + 'static,
    ) -> Self {
        self.resend_verification = Some(Arc::new(uc));
        self
    }

    pub fn with_login(mut self, uc: impl ILoginUseCase + Send + Sync + 'static) -> Self {
        self.login = Some(Arc::new(uc));
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        web::Data::new(AppState {
            sign_up_orchestrator: self.sign_up.unwrap(),
            confirm_email_use_case: self.confirm_email.unwrap(),
            resend_verification_use_case: self.resend_verification.unwrap(),
            login_use_case: self.login.unwrap(),
        })
    }
}
