use async_trait::async_trait;
use email_address::EmailAddress;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::modules::account::application::domain::entities::Account;
use crate::modules::account::application::ports::outgoing::{
    AccountQuery, AccountRepository, AccountRepositoryError, DuplicateField, PasswordHasher,
};

// ========================= Sign-up Request =========================
/// Validated sign-up request, deserializable directly from JSON.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    email: String,
    nickname: String,
    password: String,
}

#[derive(Debug, Clone)]
pub enum SignUpRequestError {
    EmptyEmail,
    InvalidEmailFormat,
    InvalidNickname,
    InvalidPasswordLength,
}

impl std::fmt::Display for SignUpRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignUpRequestError::EmptyEmail => write!(f, "Email cannot be empty"),
            SignUpRequestError::InvalidEmailFormat => write!(f, "Invalid email format"),
            SignUpRequestError::InvalidNickname => write!(
                f,
                "Nickname must be 3-20 characters of lowercase letters, digits, '-' or '_'"
            ),
            SignUpRequestError::InvalidPasswordLength => {
                write!(f, "Password must be between 8 and 50 characters")
            }
        }
    }
}

impl std::error::Error for SignUpRequestError {}

impl SignUpRequest {
    pub fn new(
        email: String,
        nickname: String,
        password: String,
    ) -> Result<Self, SignUpRequestError> {
        let email = Self::validate_email(email)?;
        let nickname = Self::validate_nickname(nickname)?;
        let password = Self::validate_password(password)?;

        Ok(Self {
            email,
            nickname,
            password,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    fn validate_email(email: String) -> Result<String, SignUpRequestError> {
        let email = email.trim();

        if email.is_empty() {
            return Err(SignUpRequestError::EmptyEmail);
        }

        if !EmailAddress::is_valid(email) {
            return Err(SignUpRequestError::InvalidEmailFormat);
        }

        Ok(email.to_lowercase())
    }

    fn validate_nickname(nickname: String) -> Result<String, SignUpRequestError> {
        let nickname = nickname.trim();

        let len = nickname.chars().count();
        if !(3..=20).contains(&len) {
            return Err(SignUpRequestError::InvalidNickname);
        }

        let all_allowed = nickname
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !all_allowed {
            return Err(SignUpRequestError::InvalidNickname);
        }

        Ok(nickname.to_string())
    }

    fn validate_password(password: String) -> Result<String, SignUpRequestError> {
        if !(8..=50).contains(&password.chars().count()) {
            return Err(SignUpRequestError::InvalidPasswordLength);
        }

        Ok(password)
    }
}

// Custom deserialization that validates during parsing
impl<'de> Deserialize<'de> for SignUpRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct SignUpRequestHelper {
            email: String,
            nickname: String,
            password: String,
        }

        let helper = SignUpRequestHelper::deserialize(deserializer)?;
        SignUpRequest::new(helper.email, helper.nickname, helper.password)
            .map_err(serde::de::Error::custom)
    }
}

// ========================= Sign-up Output =========================
#[derive(Debug, Clone)]
pub struct SignUpOutput {
    pub account_id: Uuid,
    pub email: String,
    pub nickname: String,
    pub verification_token: String,
}

// ========================= Sign-up Errors =========================
#[derive(Debug, Clone, thiserror::Error)]
pub enum SignUpError {
    /// Both flags are populated from independent checks so the caller can
    /// report every conflicting field at once.
    #[error("email or nickname already in use")]
    AlreadyInUse {
        email_taken: bool,
        nickname_taken: bool,
    },

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

// ========================= Sign-up Use Case =========================
#[async_trait]
pub trait ISignUpUseCase: Send + Sync {
    async fn execute(&self, request: SignUpRequest) -> Result<SignUpOutput, SignUpError>;
}

pub struct SignUpUseCase<Q, R, H>
where
    Q: AccountQuery + Send + Sync,
    R: AccountRepository + Send + Sync,
    H: PasswordHasher + Send + Sync,
{
    query: Q,
    repository: R,
    password_hasher: H,
}

impl<Q, R, H> SignUpUseCase<Q, R, H>
where
    Q: AccountQuery + Send + Sync,
    R: AccountRepository + Send + Sync,
    H: PasswordHasher + Send + Sync,
{
    pub fn new(query: Q, repository: R, password_hasher: H) -> Self {
        Self {
            query,
            repository,
            password_hasher,
        }
    }
}

#[async_trait]
impl<Q, R, H> ISignUpUseCase for SignUpUseCase<Q, R, H>
where
    Q: AccountQuery + Send + Sync,
    R: AccountRepository + Send + Sync,
    H: PasswordHasher + Send + Sync,
{
    async fn execute(&self, request: SignUpRequest) -> Result<SignUpOutput, SignUpError> {
        // Both uniqueness checks always run, so a submission that collides on
        // email AND nickname reports both fields in one round trip.
        let email_taken = self
            .query
            .exists_by_email(request.email())
            .await
            .map_err(|e| SignUpError::RepositoryError(e.to_string()))?;

        let nickname_taken = self
            .query
            .exists_by_nickname(request.nickname())
            .await
            .map_err(|e| SignUpError::RepositoryError(e.to_string()))?;

        if email_taken || nickname_taken {
            return Err(SignUpError::AlreadyInUse {
                email_taken,
                nickname_taken,
            });
        }

        let password_hash = self
            .password_hasher
            .hash_password(request.password())
            .await
            .map_err(|e| SignUpError::HashingFailed(e.to_string()))?;

        let mut account = Account::new(
            request.email().to_string(),
            request.nickname().to_string(),
            password_hash,
        );
        let issued = account.issue_verification_token(chrono::Utc::now());

        // The checks above are advisory; the unique constraints in the store
        // are the real guarantee. A concurrent insert surfaces here.
        match self.repository.create_account(account).await {
            Ok(created) => Ok(SignUpOutput {
                account_id: created.id,
                email: created.email,
                nickname: created.nickname,
                verification_token: issued.value,
            }),
            Err(AccountRepositoryError::Duplicate(DuplicateField::Email)) => {
                Err(SignUpError::AlreadyInUse {
                    email_taken: true,
                    nickname_taken: false,
                })
            }
            Err(AccountRepositoryError::Duplicate(DuplicateField::Nickname)) => {
                Err(SignUpError::AlreadyInUse {
                    email_taken: false,
                    nickname_taken: true,
                })
            }
            Err(e) => Err(SignUpError::RepositoryError(e.to_string())),
        }
    }
}
