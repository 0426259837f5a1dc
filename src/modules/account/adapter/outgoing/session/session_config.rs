use std::env;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret_key: String,
    pub issuer: String,
    /// Session lifetime in seconds.
    pub session_expiry: i64,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let secret_key = env::var("SESSION_SECRET").expect("SESSION_SECRET must be set");

        // HS256 needs at least 32 bytes of key material
        if secret_key.len() < 32 {
            panic!("SESSION_SECRET must be at least 32 characters long for HS256");
        }

        let session_expiry = env::var("SESSION_EXPIRY")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<i64>()
            .unwrap_or_else(|_| panic!("Invalid SESSION_EXPIRY value"));

        if session_expiry <= 0 {
            panic!("SESSION_EXPIRY must be positive");
        }

        let issuer = env::var("SESSION_ISSUER").unwrap_or_else(|_| "StudyHub".to_string());

        Self {
            secret_key,
            issuer,
            session_expiry,
        }
    }
}
