use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::controllers::usuario_controller::UsuarioController;
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::usuario_dto::{
    ActualizarPerfilRequest, ActualizarUsuarioRequest, CambiarEstadoUsuarioRequest,
    CrearUsuarioRequest, UsuarioFiltros,
};
use crate::middleware::auth::{AdminUser, AuthenticatedUser};
use crate::models::usuario::UsuarioResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppPath, AppQuery, ValidatedJson};

/// Gestión de usuarios (solo administradores)
pub fn create_usuario_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_usuarios).post(create_usuario))
        .route(
            "/:id",
            get(get_usuario).put(update_usuario).delete(desactivar_usuario),
        )
        .route("/:id/estado", put(cambiar_estado))
}

/// Perfil del usuario autenticado
pub fn create_perfil_router() -> Router<AppState> {
    Router::new().route("/", get(get_perfil).put(update_perfil))
}

async fn list_usuarios(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(filtros): AppQuery<UsuarioFiltros>,
) -> Result<Json<ApiResponse<ListResponse<UsuarioResponse>>>, AppError> {
    let controller = UsuarioController::new(state.db.clone());
    Ok(Json(controller.list(filtros).await?))
}

async fn get_usuario(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<UsuarioResponse>>, AppError> {
    let controller = UsuarioController::new(state.db.clone());
    Ok(Json(controller.get(id).await?))
}

async fn create_usuario(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<CrearUsuarioRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UsuarioResponse>>), AppError> {
    let controller = UsuarioController::new(state.db.clone());
    let response = controller.create(request, state.passwords).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_usuario(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<i64>,
    ValidatedJson(request): ValidatedJson<ActualizarUsuarioRequest>,
) -> Result<Json<ApiResponse<UsuarioResponse>>, AppError> {
    let controller = UsuarioController::new(state.db.clone());
    Ok(Json(controller.update(admin.id(), id, request).await?))
}

async fn cambiar_estado(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    ValidatedJson(request): ValidatedJson<CambiarEstadoUsuarioRequest>,
) -> Result<Json<ApiResponse<UsuarioResponse>>, AppError> {
    let controller = UsuarioController::new(state.db.clone());
    Ok(Json(controller.cambiar_estado(id, request).await?))
}

async fn desactivar_usuario(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = UsuarioController::new(state.db.clone());
    Ok(Json(controller.desactivar(admin.id(), id).await?))
}

async fn get_perfil(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Json<ApiResponse<UsuarioResponse>> {
    let controller = UsuarioController::new(state.db.clone());
    Json(controller.perfil(user.usuario))
}

async fn update_perfil(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<ActualizarPerfilRequest>,
) -> Result<Json<ApiResponse<UsuarioResponse>>, AppError> {
    let controller = UsuarioController::new(state.db.clone());
    Ok(Json(controller.actualizar_perfil(user.id(), request).await?))
}
