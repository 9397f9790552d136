use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use validator::Validate;

use crate::controllers::evento_controller::EventoController;
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::evento_dto::{
    ActualizarEventoRequest, CambiarEstadoEventoRequest, CrearEventoRequest, EventoFiltros,
    EventoResponse, InscripcionRequest,
};
use crate::middleware::auth::{AdminUser, AuthenticatedUser};
use crate::models::evento::EventoAsistente;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppPath, AppQuery, ValidatedJson};

pub fn create_evento_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_eventos).post(create_evento))
        .route(
            "/:id",
            get(get_evento).put(update_evento).delete(delete_evento),
        )
        .route("/:id/estado", put(cambiar_estado))
        .route(
            "/:id/inscripcion",
            post(inscribir).delete(cancelar_inscripcion),
        )
        .route("/:id/asistentes", get(asistentes))
}

async fn list_eventos(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    AppQuery(filtros): AppQuery<EventoFiltros>,
) -> Result<Json<ApiResponse<ListResponse<EventoResponse>>>, AppError> {
    let controller = EventoController::new(state.db.clone());
    Ok(Json(controller.list(filtros).await?))
}

async fn get_evento(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<EventoResponse>>, AppError> {
    let controller = EventoController::new(state.db.clone());
    Ok(Json(controller.get(id).await?))
}

async fn create_evento(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ValidatedJson(request): ValidatedJson<CrearEventoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EventoResponse>>), AppError> {
    let controller = EventoController::new(state.db.clone());
    let response = controller.create(request, admin.id()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_evento(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    ValidatedJson(request): ValidatedJson<ActualizarEventoRequest>,
) -> Result<Json<ApiResponse<EventoResponse>>, AppError> {
    let controller = EventoController::new(state.db.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn cambiar_estado(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    ValidatedJson(request): ValidatedJson<CambiarEstadoEventoRequest>,
) -> Result<Json<ApiResponse<EventoResponse>>, AppError> {
    let controller = EventoController::new(state.db.clone());
    Ok(Json(controller.cambiar_estado(id, request).await?))
}

async fn delete_evento(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = EventoController::new(state.db.clone());
    Ok(Json(controller.delete(id).await?))
}

/// El cuerpo es opcional: sin él se inscribe al usuario autenticado
async fn inscribir(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<i64>,
    body: Option<Json<InscripcionRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<EventoAsistente>>), AppError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    request.validate()?;

    let controller = EventoController::new(state.db.clone());
    let response = controller.inscribir(id, &user.usuario, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn cancelar_inscripcion(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = EventoController::new(state.db.clone());
    Ok(Json(controller.cancelar_inscripcion(id, &user.usuario).await?))
}

async fn asistentes(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Vec<EventoAsistente>>>, AppError> {
    let controller = EventoController::new(state.db.clone());
    Ok(Json(controller.asistentes(id).await?))
}
