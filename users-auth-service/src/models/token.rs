//! Token models - signed strings handed to callers and the claims inside them.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::Role;

/// Which secret a token is signed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Public identifier of the identity
    pub user_public_id: Uuid,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique per token so two tokens minted in the same second differ
    pub jti: String,
    /// Present on refresh tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized: Option<bool>,
}

/// A freshly signed token together with what it was minted for.
#[derive(Clone)]
pub struct IssuedToken {
    pub value: String,
    pub public_id: Uuid,
    pub role: Role,
    pub ttl: Duration,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("value", &"[redacted]")
            .field("public_id", &self.public_id)
            .field("role", &self.role)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Access and refresh token minted together on sign-in or refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Identity proven by a valid access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub public_id: Uuid,
    pub role: Role,
}
