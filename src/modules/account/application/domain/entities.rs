use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// A verification token together with the instant it was generated.
/// The timestamp drives the resend cooldown.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub value: String,
    pub issued_at: DateTime<Utc>,
}

impl IssuedToken {
    fn generate(now: DateTime<Utc>) -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            issued_at: now,
        }
    }
}

/// Verification lifecycle as a tagged state instead of loose flag columns.
/// `Verified` keeps the last issued token so a stale confirmation link can be
/// replayed as an idempotent success.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationState {
    Unverified { token: Option<IssuedToken> },
    Verified { at: DateTime<Utc>, token: IssuedToken },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Profile {
    pub bio: Option<String>,
    pub url: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPreferences {
    pub by_email: bool,
    pub by_web: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            by_email: false,
            by_web: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
    pub verification: VerificationState,
    pub profile: Profile,
    pub notifications: NotificationPreferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(email: String, nickname: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            nickname,
            password_hash,
            verification: VerificationState::Unverified { token: None },
            profile: Profile::default(),
            notifications: NotificationPreferences::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self.verification, VerificationState::Verified { .. })
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        match &self.verification {
            VerificationState::Verified { at, .. } => Some(*at),
            VerificationState::Unverified { .. } => None,
        }
    }

    pub fn verification_token(&self) -> Option<&IssuedToken> {
        match &self.verification {
            VerificationState::Unverified { token } => token.as_ref(),
            VerificationState::Verified { token, .. } => Some(token),
        }
    }

    /// Generate a fresh verification token, replacing any prior one.
    /// The previous token stops matching immediately.
    pub fn issue_verification_token(&mut self, now: DateTime<Utc>) -> IssuedToken {
        let issued = IssuedToken::generate(now);
        match &mut self.verification {
            VerificationState::Unverified { token } => *token = Some(issued.clone()),
            VerificationState::Verified { token, .. } => *token = issued.clone(),
        }
        issued
    }

    /// The token is a capability: possession proves control of the inbox.
    /// No token issued means nothing can match.
    pub fn token_matches(&self, candidate: &str) -> bool {
        self.verification_token()
            .map(|t| t.value == candidate)
            .unwrap_or(false)
    }

    /// A resend is allowed if no token was ever issued, or the cooldown
    /// window has fully elapsed since the last issuance.
    pub fn can_resend(&self, now: DateTime<Utc>) -> bool {
        match self.verification_token() {
            // 1 hour
            Some(token) => now - token.issued_at >= Duration::hours(1),
            None => true,
        }
    }

    /// Transition to `Verified`. Idempotent: completing an already verified
    /// account keeps its original `verified_at`.
    pub fn complete_sign_up(&mut self, now: DateTime<Utc>) {
        if let VerificationState::Unverified { token: Some(token) } = &self.verification {
            self.verification = VerificationState::Verified {
                at: now,
                token: token.clone(),
            };
        }
    }
}
