use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::boletin_controller::BoletinController;
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::boletin_dto::{
    ActualizarBoletinRequest, BoletinFiltros, BoletinResponse, CrearBoletinRequest,
};
use crate::middleware::auth::{AdminUser, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppMultipart, AppPath, AppQuery, ValidatedJson};

pub fn create_boletin_router(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_boletines).post(create_boletin))
        .route(
            "/:id",
            get(get_boletin).put(update_boletin).delete(delete_boletin),
        )
        .route(
            "/:id/adjunto",
            post(subir_adjunto).layer(DefaultBodyLimit::max(upload_limit)),
        )
}

async fn list_boletines(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppQuery(filtros): AppQuery<BoletinFiltros>,
) -> Result<Json<ApiResponse<ListResponse<BoletinResponse>>>, AppError> {
    let controller = BoletinController::new(state.db.clone());
    Ok(Json(controller.list(filtros, user.es_admin()).await?))
}

async fn get_boletin(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<BoletinResponse>>, AppError> {
    let controller = BoletinController::new(state.db.clone());
    Ok(Json(controller.get(id, user.es_admin()).await?))
}

async fn create_boletin(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ValidatedJson(request): ValidatedJson<CrearBoletinRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BoletinResponse>>), AppError> {
    let controller = BoletinController::new(state.db.clone());
    let response = controller.create(request, admin.id()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_boletin(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    ValidatedJson(request): ValidatedJson<ActualizarBoletinRequest>,
) -> Result<Json<ApiResponse<BoletinResponse>>, AppError> {
    let controller = BoletinController::new(state.db.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_boletin(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = BoletinController::new(state.db.clone());
    Ok(Json(controller.delete(id, &state.storage).await?))
}

async fn subir_adjunto(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    AppMultipart(multipart): AppMultipart,
) -> Result<Json<ApiResponse<BoletinResponse>>, AppError> {
    let controller = BoletinController::new(state.db.clone());
    Ok(Json(controller.subir_adjunto(id, multipart, &state.storage).await?))
}
