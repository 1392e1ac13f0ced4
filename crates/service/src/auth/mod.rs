//! Admin auth: configured dashboard accounts, argon2 password checks and
//! HS256 session tokens.

pub mod domain;
pub mod errors;
pub mod service;

pub use service::{hash_password, AdminAuthService};
