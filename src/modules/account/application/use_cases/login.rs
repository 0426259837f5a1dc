use std::sync::Arc;

use async_trait::async_trait;
use email_address::EmailAddress;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::modules::account::application::ports::outgoing::{
    AccountQuery, Authenticator, PasswordHasher, Session,
};

// ========================= Login Request =========================
/// Validated login request, deserializable directly from JSON.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone)]
pub enum LoginRequestError {
    EmptyEmail,
    InvalidEmailFormat,
    EmptyPassword,
}

impl std::fmt::Display for LoginRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginRequestError::EmptyEmail => write!(f, "Email cannot be empty"),
            LoginRequestError::InvalidEmailFormat => write!(f, "Invalid email format"),
            LoginRequestError::EmptyPassword => write!(f, "Password cannot be empty"),
        }
    }
}

impl std::error::Error for LoginRequestError {}

impl LoginRequest {
    pub fn new(email: String, password: String) -> Result<Self, LoginRequestError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(LoginRequestError::EmptyEmail);
        }
        if !EmailAddress::is_valid(&email) {
            return Err(LoginRequestError::InvalidEmailFormat);
        }

        if password.trim().is_empty() {
            return Err(LoginRequestError::EmptyPassword);
        }

        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl<'de> Deserialize<'de> for LoginRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct LoginRequestHelper {
            email: String,
            password: String,
        }

        let helper = LoginRequestHelper::deserialize(deserializer)?;
        LoginRequest::new(helper.email, helper.password).map_err(serde::de::Error::custom)
    }
}

// ========================= Login Error / Output =========================
#[derive(Debug, Clone)]
pub enum LoginError {
    InvalidCredentials,
    PasswordVerificationFailed(String),
    SessionFailed(String),
    QueryError(String),
}

impl std::fmt::Display for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginError::InvalidCredentials => write!(f, "Invalid email or password"),
            LoginError::PasswordVerificationFailed(msg) => {
                write!(f, "Password verification failed: {}", msg)
            }
            LoginError::SessionFailed(msg) => write!(f, "Session establishment failed: {}", msg),
            LoginError::QueryError(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl std::error::Error for LoginError {}

#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub account_id: Uuid,
    pub nickname: String,
    pub is_verified: bool,
    pub session: Session,
}

// ========================= Login Use Case =========================
#[async_trait]
pub trait ILoginUseCase: Send + Sync {
    async fn execute(&self, request: LoginRequest) -> Result<LoginOutput, LoginError>;
}

pub struct LoginUseCase<Q, H>
where
    Q: AccountQuery + Send + Sync,
    H: PasswordHasher + Send + Sync,
{
    query: Q,
    password_hasher: H,
    authenticator: Arc<dyn Authenticator + Send + Sync>,
}

impl<Q, H> LoginUseCase<Q, H>
where
    Q: AccountQuery + Send + Sync,
    H: PasswordHasher + Send + Sync,
{
    pub fn new(
        query: Q,
        password_hasher: H,
        authenticator: Arc<dyn Authenticator + Send + Sync>,
    ) -> Self {
        Self {
            query,
            password_hasher,
            authenticator,
        }
    }
}

#[async_trait]
impl<Q, H> ILoginUseCase for LoginUseCase<Q, H>
where
    Q: AccountQuery + Send + Sync,
    H: PasswordHasher + Send + Sync,
{
    async fn execute(&self, request: LoginRequest) -> Result<LoginOutput, LoginError> {
        // Unknown email and wrong password collapse into the same error so
        // the endpoint does not leak which emails are registered.
        let account = self
            .query
            .find_by_email(request.email())
            .await
            .map_err(|e| LoginError::QueryError(e.to_string()))?
            .ok_or(LoginError::InvalidCredentials)?;

        let is_valid = self
            .password_hasher
            .verify_password(request.password(), &account.password_hash)
            .await
            .map_err(|e| LoginError::PasswordVerificationFailed(e.to_string()))?;

        if !is_valid {
            return Err(LoginError::InvalidCredentials);
        }

        let session = self
            .authenticator
            .establish_session(account.id, &account.nickname)
            .map_err(|e| LoginError::SessionFailed(e.to_string()))?;

        Ok(LoginOutput {
            account_id: account.id,
            is_verified: account.is_verified(),
            nickname: account.nickname,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::account::application::domain::entities::Account;
    use crate::modules::account::application::ports::outgoing::{
        AccountQueryError, HashError, SessionClaims, SessionError,
    };
    use chrono::{Duration, Utc};

    struct MockAccountQuery {
        account: Option<Account>,
    }

    #[async_trait]
    impl AccountQuery for MockAccountQuery {
        async fn find_by_id(&self, _account_id: Uuid) -> Result<Option<Account>, AccountQueryError> {
            Ok(None)
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountQueryError> {
            Ok(self
                .account
                .clone()
                .filter(|account| account.email == email))
        }

        async fn exists_by_email(&self, _email: &str) -> Result<bool, AccountQueryError> {
            Ok(false)
        }

        async fn exists_by_nickname(&self, _nickname: &str) -> Result<bool, AccountQueryError> {
            Ok(false)
        }
    }

    struct MockPasswordHasher {
        matches: bool,
    }

    #[async_trait]
    impl PasswordHasher for MockPasswordHasher {
        async fn hash_password(&self, _password: &str) -> Result<String, HashError> {
            Ok("hashed_password".to_string())
        }

        async fn verify_password(&self, _password: &str, _hash: &str) -> Result<bool, HashError> {
            Ok(self.matches)
        }
    }

    struct StubAuthenticator;

    impl Authenticator for StubAuthenticator {
        fn establish_session(
            &self,
            _account_id: Uuid,
            nickname: &str,
        ) -> Result<Session, SessionError> {
            Ok(Session {
                token: "session-token".to_string(),
                principal: nickname.to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            })
        }

        fn verify_session(&self, _token: &str) -> Result<SessionClaims, SessionError> {
            Err(SessionError::InvalidSession)
        }
    }

    fn stored_account() -> Account {
        Account::new(
            "member@example.com".to_string(),
            "member".to_string(),
            "hashed_password".to_string(),
        )
    }

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest::new(email.to_string(), password.to_string())
            .expect("request should be valid")
    }

    #[tokio::test]
    async fn login_authenticates_as_nickname() {
        let query = MockAccountQuery {
            account: Some(stored_account()),
        };
        let use_case = LoginUseCase::new(
            query,
            MockPasswordHasher { matches: true },
            Arc::new(StubAuthenticator),
        );

        let result = use_case
            .execute(request("member@example.com", "password123"))
            .await;

        assert!(result.is_ok(), "Expected login to succeed, got {:?}", result);
        let output = result.unwrap();
        assert_eq!(output.nickname, "member");
        assert_eq!(output.session.principal, "member");
        assert!(!output.is_verified);
    }

    #[tokio::test]
    async fn login_unknown_email_is_invalid_credentials() {
        let query = MockAccountQuery { account: None };
        let use_case = LoginUseCase::new(
            query,
            MockPasswordHasher { matches: true },
            Arc::new(StubAuthenticator),
        );

        let result = use_case
            .execute(request("nobody@example.com", "password123"))
            .await;

        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_wrong_password_is_invalid_credentials() {
        let query = MockAccountQuery {
            account: Some(stored_account()),
        };
        let use_case = LoginUseCase::new(
            query,
            MockPasswordHasher { matches: false },
            Arc::new(StubAuthenticator),
        );

        let result = use_case
            .execute(request("member@example.com", "wrong-password"))
            .await;

        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_hasher_failure_surfaces() {
        struct FailingHasher;

        #[async_trait]
        impl PasswordHasher for FailingHasher {
            async fn hash_password(&self, _: &str) -> Result<String, HashError> {
                Err(HashError::HashFailed)
            }

            async fn verify_password(&self, _: &str, _: &str) -> Result<bool, HashError> {
                Err(HashError::TaskFailed)
            }
        }

        let query = MockAccountQuery {
            account: Some(stored_account()),
        };
        let use_case = LoginUseCase::new(query, FailingHasher, Arc::new(StubAuthenticator));

        let result = use_case
            .execute(request("member@example.com", "password123"))
            .await;

        assert!(matches!(
            result,
            Err(LoginError::PasswordVerificationFailed(_))
        ));
    }

    #[test]
    fn request_rejects_empty_and_malformed_emails() {
        assert!(matches!(
            LoginRequest::new("".to_string(), "pw".to_string()),
            Err(LoginRequestError::EmptyEmail)
        ));
        assert!(matches!(
            LoginRequest::new("not-an-email".to_string(), "pw".to_string()),
            Err(LoginRequestError::InvalidEmailFormat)
        ));
        assert!(matches!(
            LoginRequest::new("a@b.com".to_string(), "  ".to_string()),
            Err(LoginRequestError::EmptyPassword)
        ));
    }
}
