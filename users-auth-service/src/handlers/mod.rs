//! HTTP handlers for users-auth-service.

pub mod auth;

pub use auth::*;
