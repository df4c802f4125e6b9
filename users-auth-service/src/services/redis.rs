use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::RedisConfig;
use crate::models::IssuedToken;
use crate::services::ServiceError;

/// Holds the one refresh token currently valid for each identity.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Overwrites whatever was stored for the identity; the entry expires with the token.
    async fn set_refresh_token(&self, token: &IssuedToken) -> Result<(), ServiceError>;

    /// `TokenExpired` when nothing is stored, whether never issued, unset or timed out.
    async fn get_refresh_token(&self, public_id: Uuid) -> Result<String, ServiceError>;

    /// Idempotent: removing an absent entry succeeds.
    async fn unset_refresh_token(&self, public_id: Uuid) -> Result<(), ServiceError>;

    async fn health_check(&self) -> Result<(), ServiceError>;
}

fn session_key(public_id: Uuid) -> String {
    format!("refresh_token:{}", public_id)
}

/// Whole seconds for `EX`, never zero so the entry is not rejected by Redis.
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[derive(Clone)]
pub struct RedisSessionStore {
    _client: Client,
    manager: ConnectionManager,
    timeout: Duration,
}

impl RedisSessionStore {
    pub async fn new(config: &RedisConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(url = %config.url, "Connecting to Redis");
        let client = Client::open(config.url.clone())?;

        // Use ConnectionManager for automatic reconnection
        let manager = tokio::time::timeout(config.timeout(), client.get_connection_manager())
            .await
            .map_err(|_| anyhow::anyhow!("Timed out connecting to Redis"))?
            .map_err(|e| {
                tracing::error!("Failed to get Redis connection manager: {}", e);
                anyhow::anyhow!("Failed to connect to Redis: {}", e)
            })?;

        tracing::info!("Successfully connected to Redis");

        Ok(Self {
            _client: client,
            manager,
            timeout: config.timeout(),
        })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn set_refresh_token(&self, token: &IssuedToken) -> Result<(), ServiceError> {
        let mut conn = self.manager.clone();
        let key = session_key(token.public_id);

        tokio::time::timeout(
            self.timeout,
            redis::cmd("SET")
                .arg(&key)
                .arg(&token.value)
                .arg("EX")
                .arg(expiry_seconds(token.ttl))
                .query_async::<_, ()>(&mut conn),
        )
        .await?
        .map_err(|e| {
            tracing::error!(user_public_id = %token.public_id, error = %e, "Failed to store refresh token");
            ServiceError::from(e)
        })?;

        tracing::debug!(user_public_id = %token.public_id, "Refresh token stored");
        Ok(())
    }

    async fn get_refresh_token(&self, public_id: Uuid) -> Result<String, ServiceError> {
        let mut conn = self.manager.clone();

        let value: Option<String> = tokio::time::timeout(
            self.timeout,
            redis::cmd("GET")
                .arg(session_key(public_id))
                .query_async(&mut conn),
        )
        .await?
        .map_err(|e| {
            tracing::error!(user_public_id = %public_id, error = %e, "Failed to read refresh token");
            ServiceError::from(e)
        })?;

        match value {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ServiceError::TokenExpired),
        }
    }

    async fn unset_refresh_token(&self, public_id: Uuid) -> Result<(), ServiceError> {
        let mut conn = self.manager.clone();

        tokio::time::timeout(
            self.timeout,
            redis::cmd("DEL")
                .arg(session_key(public_id))
                .query_async::<_, i64>(&mut conn),
        )
        .await?
        .map_err(|e| {
            tracing::error!(user_public_id = %public_id, error = %e, "Failed to delete refresh token");
            ServiceError::from(e)
        })?;

        tracing::debug!(user_public_id = %public_id, "Refresh token removed");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        let mut conn = self.manager.clone();
        tokio::time::timeout(
            self.timeout,
            redis::cmd("PING").query_async::<_, String>(&mut conn),
        )
        .await??;
        Ok(())
    }
}

/// Process-local session store honouring TTLs, for tests and local runs.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<Uuid, (String, Instant)>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| {
                let now = Instant::now();
                entries.values().filter(|(_, exp)| *exp > now).count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, (String, Instant)>>, ServiceError> {
        self.entries
            .lock()
            .map_err(|e| ServiceError::internal("Session store mutex poisoned", e))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn set_refresh_token(&self, token: &IssuedToken) -> Result<(), ServiceError> {
        let expires_at = Instant::now() + Duration::from_secs(expiry_seconds(token.ttl));
        self.lock()?
            .insert(token.public_id, (token.value.clone(), expires_at));
        Ok(())
    }

    async fn get_refresh_token(&self, public_id: Uuid) -> Result<String, ServiceError> {
        let mut entries = self.lock()?;
        match entries.get(&public_id) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(value.clone()),
            Some(_) => {
                entries.remove(&public_id);
                Err(ServiceError::TokenExpired)
            }
            None => Err(ServiceError::TokenExpired),
        }
    }

    async fn unset_refresh_token(&self, public_id: Uuid) -> Result<(), ServiceError> {
        self.lock()?.remove(&public_id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn token(public_id: Uuid, value: &str, ttl: Duration) -> IssuedToken {
        IssuedToken {
            value: value.to_string(),
            public_id,
            role: Role::Candidate,
            ttl,
        }
    }

    #[test]
    fn test_session_key_and_expiry() {
        let id = Uuid::nil();
        assert_eq!(
            session_key(id),
            "refresh_token:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(expiry_seconds(Duration::from_millis(10)), 1);
        assert_eq!(expiry_seconds(Duration::from_secs(3600)), 3600);
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_token() {
        let store = InMemorySessionStore::new();
        let id = Uuid::new_v4();

        store
            .set_refresh_token(&token(id, "first", Duration::from_secs(60)))
            .await
            .unwrap();
        store
            .set_refresh_token(&token(id, "second", Duration::from_secs(60)))
            .await
            .unwrap();

        assert_eq!(store.get_refresh_token(id).await.unwrap(), "second");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_entry_is_token_expired() {
        let store = InMemorySessionStore::new();
        assert!(matches!(
            store.get_refresh_token(Uuid::new_v4()).await,
            Err(ServiceError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn test_unset_is_idempotent() {
        let store = InMemorySessionStore::new();
        let id = Uuid::new_v4();
        store
            .set_refresh_token(&token(id, "value", Duration::from_secs(60)))
            .await
            .unwrap();

        store.unset_refresh_token(id).await.unwrap();
        store.unset_refresh_token(id).await.unwrap();
        assert!(matches!(
            store.get_refresh_token(id).await,
            Err(ServiceError::TokenExpired)
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_entry_expires_with_ttl() {
        let store = InMemorySessionStore::new();
        let id = Uuid::new_v4();
        store
            .set_refresh_token(&token(id, "value", Duration::from_secs(1)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(matches!(
            store.get_refresh_token(id).await,
            Err(ServiceError::TokenExpired)
        ));
    }

    #[tokio::test]
    #[ignore] // Requires running Redis
    async fn test_redis_round_trip() {
        let store = RedisSessionStore::new(&RedisConfig {
            url: "redis://127.0.0.1:6379".to_string(),
            timeout_seconds: 2,
        })
        .await
        .unwrap();
        let id = Uuid::new_v4();

        store
            .set_refresh_token(&token(id, "value", Duration::from_secs(30)))
            .await
            .unwrap();
        assert_eq!(store.get_refresh_token(id).await.unwrap(), "value");
        store.unset_refresh_token(id).await.unwrap();
        store.unset_refresh_token(id).await.unwrap();
        assert!(matches!(
            store.get_refresh_token(id).await,
            Err(ServiceError::TokenExpired)
        ));
    }
}
