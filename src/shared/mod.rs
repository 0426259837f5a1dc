pub mod api;
pub mod security;
