use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::{TokenConfig, TokenSettings};
use crate::models::{IssuedToken, Role, TokenClaims, TokenKind};
use crate::services::ServiceError;

/// Signing material for one token kind.
#[derive(Clone)]
struct SigningKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: std::time::Duration,
}

impl SigningKeys {
    fn from_settings(settings: &TokenSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            ttl: settings.ttl(),
        }
    }
}

/// HS256 codec for access and refresh tokens.
///
/// Each kind has its own secret, so a refresh token never verifies as an
/// access token and vice versa.
#[derive(Clone)]
pub struct TokenCodec {
    access: SigningKeys,
    refresh: SigningKeys,
}

impl TokenCodec {
    pub fn new(config: &TokenConfig) -> Self {
        tracing::info!("Token codec initialized with HS256 secrets");
        Self {
            access: SigningKeys::from_settings(&config.access),
            refresh: SigningKeys::from_settings(&config.refresh),
        }
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Sign a token of `kind` for the identity, valid for the configured TTL.
    pub fn issue(
        &self,
        kind: TokenKind,
        public_id: Uuid,
        role: Role,
    ) -> Result<IssuedToken, ServiceError> {
        self.issue_at(kind, public_id, role, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        kind: TokenKind,
        public_id: Uuid,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, ServiceError> {
        let keys = self.keys(kind);
        let ttl = Duration::from_std(keys.ttl)
            .map_err(|e| ServiceError::internal("Token TTL out of range", e))?;

        let claims = TokenClaims {
            user_public_id: public_id,
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
            authorized: match kind {
                TokenKind::Access => None,
                TokenKind::Refresh => Some(true),
            },
        };

        let value = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding_key)
            .map_err(|e| {
                ServiceError::internal(&format!("Failed to encode {} token", kind.as_str()), e)
            })?;

        Ok(IssuedToken {
            value,
            public_id,
            role,
            ttl: keys.ttl,
        })
    }

    /// Verify signature and expiry. Every failure, expiry included, is `InvalidToken`.
    pub fn decode(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.keys(kind).decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(kind = kind.as_str(), error = %e, "Token rejected");
                ServiceError::InvalidToken
            })
    }
}
