pub mod jwt_authenticator;
pub mod session_config;

pub use jwt_authenticator::JwtAuthenticator;
pub use session_config::SessionConfig;
