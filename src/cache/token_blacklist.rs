//! Lista de tokens revocados
//!
//! Un token revocado (logout) se guarda por su `jti` hasta que expira.
//! Con `REDIS_URL` se comparte entre instancias; sin él vive en memoria.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::redis_client::RedisClient;

#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Revocar un `jti` durante `ttl_secs` segundos
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<()>;

    async fn is_revoked(&self, jti: &str) -> Result<bool>;
}

/// Lista en memoria del proceso
#[derive(Clone, Default)]
pub struct MemoryBlacklist {
    revoked: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl MemoryBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limpiar entradas expiradas
    pub async fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut revoked = self.revoked.write().await;
        let before = revoked.len();
        revoked.retain(|_, expires_at| *expires_at > now);
        before - revoked.len()
    }

    pub async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }
}

#[async_trait]
impl TokenBlacklist for MemoryBlacklist {
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<()> {
        let expires_at = Utc::now() + Duration::seconds(ttl_secs as i64);
        let mut revoked = self.revoked.write().await;
        revoked.insert(jti.to_string(), expires_at);
        debug!("🚫 Token {} revocado en memoria ({} entradas)", jti, revoked.len());
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool> {
        let revoked = self.revoked.read().await;
        Ok(revoked
            .get(jti)
            .map_or(false, |expires_at| *expires_at > Utc::now()))
    }
}

/// Lista compartida en Redis (`SET <prefijo>:revoked:<jti> EX ttl`)
#[derive(Clone)]
pub struct RedisBlacklist {
    redis: RedisClient,
}

impl RedisBlacklist {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl TokenBlacklist for RedisBlacklist {
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<()> {
        let key = self.redis.revoked_token_key(jti);
        self.redis.set_ex(&key, Utc::now().timestamp(), ttl_secs.max(1)).await
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool> {
        let key = self.redis.revoked_token_key(jti);
        self.redis.exists(&key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_revoked_token_is_reported() {
        let blacklist = MemoryBlacklist::new();
        assert!(!blacklist.is_revoked("jti-1").await.unwrap());

        blacklist.revoke("jti-1", 60).await.unwrap();
        assert!(blacklist.is_revoked("jti-1").await.unwrap());
        assert!(!blacklist.is_revoked("jti-2").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_entries_are_ignored_and_cleaned() {
        let blacklist = MemoryBlacklist::new();
        blacklist.revoke("caducado", 0).await.unwrap();
        blacklist.revoke("vigente", 600).await.unwrap();

        assert!(!blacklist.is_revoked("caducado").await.unwrap());
        assert_eq!(blacklist.cleanup_expired().await, 1);
        assert_eq!(blacklist.len().await, 1);
    }
}
