//! Services layer for the users auth service.
//!
//! Credential store, session store, token codec and the auth engine that
//! composes them.

pub mod auth;
mod database;
pub mod error;
mod jwt;
pub mod redis;

pub use self::auth::AuthService;
pub use database::{CredentialStore, Database, InMemoryCredentialStore, RowCounts};
pub use error::{ErrorKind, ServiceError};
pub use jwt::TokenCodec;
pub use self::redis::{InMemorySessionStore, RedisSessionStore, SessionStore};
