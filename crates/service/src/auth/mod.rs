//! Auth module: admin login, user registration and password hashing.
//!
//! Persistence goes through the `Storage` trait, so the same service runs on
//! both backends.

pub mod domain;
pub mod service;

pub use service::{hash_password, AuthConfig, AuthService};
