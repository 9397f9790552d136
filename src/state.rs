//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::cache::TokenBlacklist;
use crate::config::environment::EnvironmentConfig;
use crate::database::DatabaseConnection;
use crate::middleware::rate_limit::RateLimitState;
use crate::services::{JwtConfig, JwtService, PasswordService, StorageService};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<EnvironmentConfig>,
    pub jwt: JwtService,
    pub passwords: PasswordService,
    pub blacklist: Arc<dyn TokenBlacklist>,
    pub storage: StorageService,
    pub rate_limit: RateLimitState,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        config: EnvironmentConfig,
        blacklist: Arc<dyn TokenBlacklist>,
    ) -> Self {
        Self {
            jwt: JwtService::new(JwtConfig::from(&config)),
            passwords: PasswordService::new(config.bcrypt_cost),
            storage: StorageService::new(&config.upload_dir, config.max_upload_bytes),
            rate_limit: RateLimitState::from_config(&config),
            config: Arc::new(config),
            db,
            blacklist,
        }
    }
}
