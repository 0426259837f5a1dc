use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::modules::account::application::ports::outgoing::{
    Authenticator, Session, SessionClaims, SessionError,
};

use super::session_config::SessionConfig;

/// Wire shape of the session token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionTokenClaims {
    sub: Uuid,
    nickname: String,
    token_type: String,
    exp: i64,
    iat: i64,
    nbf: i64,
}

/// Stateless session backed by an HS256 token. The nickname travels inside
/// the token, so resolving the principal needs no database round trip.
#[derive(Clone)]
pub struct JwtAuthenticator {
    config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("config", &"SessionConfig")
            .finish()
    }
}

impl JwtAuthenticator {
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }
}

impl Authenticator for JwtAuthenticator {
    fn establish_session(
        &self,
        account_id: Uuid,
        nickname: &str,
    ) -> Result<Session, SessionError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.config.session_expiry);

        let claims = SessionTokenClaims {
            sub: account_id,
            nickname: nickname.to_string(),
            token_type: "session".to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::EncodingFailed(e.to_string()))?;

        Ok(Session {
            token,
            principal: nickname.to_string(),
            expires_at,
        })
    }

    fn verify_session(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 30;
        validation.validate_nbf = true;

        let decoded = decode::<SessionTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;

                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Session verification failed: token expired");
                        SessionError::SessionExpired
                    }
                    ErrorKind::InvalidSignature => {
                        tracing::error!("Security alert: invalid session token signature");
                        SessionError::InvalidSession
                    }
                    _ => {
                        tracing::warn!("Session verification failed: malformed token");
                        SessionError::InvalidSession
                    }
                }
            })?;

        let claims = decoded.claims;
        if claims.token_type != "session" {
            tracing::warn!(
                "Token type mismatch: expected 'session', got '{}'",
                claims.token_type
            );
            return Err(SessionError::InvalidSession);
        }

        Ok(SessionClaims {
            account_id: claims.sub,
            nickname: claims.nickname,
        })
    }
}
