//! Cache
//!
//! Conexión a Redis y lista de tokens revocados.

pub mod cache_config;
pub mod redis_client;
pub mod token_blacklist;

pub use cache_config::CacheConfig;
pub use token_blacklist::{MemoryBlacklist, RedisBlacklist, TokenBlacklist};
