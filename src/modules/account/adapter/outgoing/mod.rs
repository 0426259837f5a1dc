pub mod account_query_postgres;
pub mod account_repository_postgres;
pub mod sea_orm_entity;
pub mod security;
pub mod session;

pub use account_query_postgres::AccountQueryPostgres;
pub use account_repository_postgres::AccountRepositoryPostgres;
