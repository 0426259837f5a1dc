pub mod account_query;
pub mod account_repository;
pub mod authenticator;
pub mod password_hasher;

pub use account_query::{AccountQuery, AccountQueryError};
pub use account_repository::{AccountRepository, AccountRepositoryError, DuplicateField};
pub use authenticator::{Authenticator, Session, SessionClaims, SessionError};
pub use password_hasher::{HashError, PasswordHasher};
