use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use intranet_cluster::build_router;
use intranet_cluster::cache::redis_client::RedisClient;
use intranet_cluster::cache::{CacheConfig, MemoryBlacklist, RedisBlacklist, TokenBlacklist};
use intranet_cluster::config::{DatabaseConfig, EnvironmentConfig};
use intranet_cluster::database::DatabaseConnection;
use intranet_cluster::services::CategoriaArchivo;
use intranet_cluster::state::AppState;

/// Cada cuánto se purgan los tokens revocados ya expirados
const BLACKLIST_CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(fmt::layer())
        .init();

    info!("🏢 Intranet del Clúster - API");
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;
    info!("🌍 Entorno: {}", config.environment);
    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS_ORIGINS vacío en producción: se acepta cualquier origen");
    }

    // Inicializar base de datos
    let db = match DatabaseConnection::connect(&DatabaseConfig::from(&config)).await {
        Ok(db) => db,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if config.run_migrations {
        db.run_migrations().await.context("Error aplicando migraciones")?;
    }

    let blacklist = crear_blacklist(&config).await?;

    for categoria in CategoriaArchivo::ALL {
        let dir = std::path::Path::new(&config.upload_dir).join(categoria.subdir());
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("No se pudo crear {}", dir.display()))?;
    }
    info!("📁 Archivos subidos en: {}", config.upload_dir);

    let addr = config.server_url();
    let app = build_router(AppState::new(db, config, blacklist));

    info!("🌐 Servidor iniciando en: http://{}", addr);
    info!("📋 Endpoints disponibles:");
    info!("   GET  /health");
    info!("   POST /api/auth/register | /api/auth/login | /api/auth/refresh-token");
    info!("   POST /api/auth/logout   GET /api/auth/me | /api/auth/verify");
    info!("   *    /api/usuarios /api/perfil /api/empresas /api/eventos");
    info!("   *    /api/boletines /api/banners /api/estadisticas /api/admin");
    info!("   GET  /uploads/*");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("No se pudo abrir {}", addr))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("👋 Servidor detenido");
    Ok(())
}

/// Redis si hay `REDIS_URL`; si no, lista en memoria con limpieza periódica
async fn crear_blacklist(config: &EnvironmentConfig) -> Result<Arc<dyn TokenBlacklist>> {
    if let Some(url) = &config.redis_url {
        let redis = RedisClient::new(CacheConfig::new(url.clone()))
            .await
            .context("Error de Redis")?;
        return Ok(Arc::new(RedisBlacklist::new(redis)));
    }

    info!("💾 REDIS_URL no definida: tokens revocados en memoria");
    let memory = MemoryBlacklist::new();
    let cleanup = memory.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(BLACKLIST_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = cleanup.cleanup_expired().await;
            if removed > 0 {
                info!("🧹 {} tokens revocados expirados eliminados", removed);
            }
        }
    });
    Ok(Arc::new(memory))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
