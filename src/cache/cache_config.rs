//! Conexión a Redis para la lista de tokens revocados

/// URL y prefijo de claves; varias instancias pueden compartir un Redis
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: String,
    pub key_prefix: String,
}

impl CacheConfig {
    pub fn new(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            ..Self::default()
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            key_prefix: "intranet_cluster".to_string(),
        }
    }
}
