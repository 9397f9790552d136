use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::empresa_controller::EmpresaController;
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::empresa_dto::{ActualizarEmpresaRequest, CrearEmpresaRequest, EmpresaFiltros};
use crate::middleware::auth::{AdminUser, AuthenticatedUser};
use crate::models::empresa::EmpresaConvenio;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppMultipart, AppPath, AppQuery, ValidatedJson};

pub fn create_empresa_router(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_empresas).post(create_empresa))
        .route(
            "/:id",
            get(get_empresa).put(update_empresa).delete(delete_empresa),
        )
        .route(
            "/:id/logo",
            post(subir_logo).layer(DefaultBodyLimit::max(upload_limit)),
        )
}

async fn list_empresas(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppQuery(filtros): AppQuery<EmpresaFiltros>,
) -> Result<Json<ApiResponse<ListResponse<EmpresaConvenio>>>, AppError> {
    let controller = EmpresaController::new(state.db.clone());
    Ok(Json(controller.list(filtros, user.es_admin()).await?))
}

async fn get_empresa(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<EmpresaConvenio>>, AppError> {
    let controller = EmpresaController::new(state.db.clone());
    Ok(Json(controller.get(id, user.es_admin()).await?))
}

async fn create_empresa(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<CrearEmpresaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EmpresaConvenio>>), AppError> {
    let controller = EmpresaController::new(state.db.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_empresa(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    ValidatedJson(request): ValidatedJson<ActualizarEmpresaRequest>,
) -> Result<Json<ApiResponse<EmpresaConvenio>>, AppError> {
    let controller = EmpresaController::new(state.db.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_empresa(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = EmpresaController::new(state.db.clone());
    Ok(Json(controller.delete(id).await?))
}

async fn subir_logo(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    AppMultipart(multipart): AppMultipart,
) -> Result<Json<ApiResponse<EmpresaConvenio>>, AppError> {
    let controller = EmpresaController::new(state.db.clone());
    Ok(Json(controller.subir_logo(id, multipart, &state.storage).await?))
}
