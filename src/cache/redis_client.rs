//! Cliente Redis

use anyhow::{Context, Result};
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::{debug, error, info};

use super::CacheConfig;
use crate::config::database::mask_url;

/// Conexión gestionada (se reconecta sola) con las claves bajo `key_prefix`
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
    config: CacheConfig,
}

impl RedisClient {
    pub async fn new(config: CacheConfig) -> Result<Self> {
        info!("🔗 Conectando a Redis: {}", mask_url(&config.redis_url));

        let client = redis::Client::open(config.redis_url.clone())?;
        let manager = ConnectionManager::new(client).await?;

        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");
        Ok(Self { manager, config })
    }

    /// `<prefijo>:revoked:<jti>`
    pub fn revoked_token_key(&self, jti: &str) -> String {
        format!("{}:revoked:{}", self.config.key_prefix, jti)
    }

    /// `SET key value EX ttl`
    pub async fn set_ex(&self, key: &str, value: i64, ttl_secs: u64) -> Result<()> {
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| {
                error!("❌ Error escribiendo {} en Redis: {}", key, e);
                e
            })
            .with_context(|| format!("SET {}", key))?;
        debug!("💾 SET {} (TTL: {}s)", key, ttl_secs);
        Ok(())
    }

    pub async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.manager.clone();
        let exists: bool = conn
            .exists(key)
            .await
            .with_context(|| format!("EXISTS {}", key))?;
        Ok(exists)
    }
}
