//! Router de la API
//!
//! `build_router` arma todas las rutas con sus capas: trazas, compresión,
//! CORS, rate limit en autenticación y límite de cuerpo en las subidas.

pub mod admin_routes;
pub mod auth_routes;
pub mod banner_routes;
pub mod boletin_routes;
pub mod empresa_routes;
pub mod estadistica_routes;
pub mod evento_routes;
pub mod usuario_routes;

use axum::{middleware, routing::get, Router};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::{cors_layer, rate_limit_middleware};
use crate::services::storage_service::PUBLIC_PREFIX;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Margen para las cabeceras del formulario multipart
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

    let auth = auth_routes::create_auth_router()
        .route_layer(middleware::from_fn_with_state(
            state.rate_limit.clone(),
            rate_limit_middleware,
        ))
        .merge(auth_routes::create_session_router());

    let api = Router::new()
        .nest("/auth", auth)
        .nest("/usuarios", usuario_routes::create_usuario_router())
        .nest("/perfil", usuario_routes::create_perfil_router())
        .nest("/empresas", empresa_routes::create_empresa_router(upload_limit))
        .nest("/eventos", evento_routes::create_evento_router())
        .nest("/boletines", boletin_routes::create_boletin_router(upload_limit))
        .nest("/banners", banner_routes::create_banner_router(upload_limit))
        .nest("/estadisticas", estadistica_routes::create_estadistica_router())
        .nest("/admin", admin_routes::create_admin_router());

    Router::new()
        .route("/health", get(admin_routes::health))
        .nest("/api", api)
        .nest_service(PUBLIC_PREFIX, ServeDir::new(state.storage.base_dir()))
        .fallback(ruta_no_encontrada)
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ruta_no_encontrada() -> AppError {
    AppError::NotFound("Ruta no encontrada".to_string())
}
