use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::controllers::estadistica_controller::EstadisticaController;
use crate::dto::api_response::ApiResponse;
use crate::dto::estadistica_dto::{
    ActualizarEstadisticaConfigRequest, CrearEstadisticaConfigRequest, EstadisticaValor,
};
use crate::middleware::auth::{AdminUser, AuthenticatedUser};
use crate::models::estadistica::EstadisticaConfig;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppPath, ValidatedJson};

pub fn create_estadistica_router() -> Router<AppState> {
    Router::new()
        .route("/", get(valores))
        .route("/config", get(list_config).post(create_config))
        .route("/config/:id", put(update_config).delete(delete_config))
}

async fn valores(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<EstadisticaValor>>>, AppError> {
    let controller = EstadisticaController::new(state.db.clone());
    Ok(Json(controller.valores().await?))
}

async fn list_config(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<EstadisticaConfig>>>, AppError> {
    let controller = EstadisticaController::new(state.db.clone());
    Ok(Json(controller.list_config().await?))
}

async fn create_config(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<CrearEstadisticaConfigRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EstadisticaConfig>>), AppError> {
    let controller = EstadisticaController::new(state.db.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_config(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    ValidatedJson(request): ValidatedJson<ActualizarEstadisticaConfigRequest>,
) -> Result<Json<ApiResponse<EstadisticaConfig>>, AppError> {
    let controller = EstadisticaController::new(state.db.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_config(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = EstadisticaController::new(state.db.clone());
    Ok(Json(controller.delete(id).await?))
}
