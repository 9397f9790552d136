use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::banner_controller::BannerController;
use crate::dto::api_response::ApiResponse;
use crate::dto::banner_dto::{ActualizarBannerRequest, CrearBannerRequest, ReordenarBannersRequest};
use crate::middleware::auth::AdminUser;
use crate::models::banner::Banner;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppMultipart, AppPath, ValidatedJson};

pub fn create_banner_router(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/activos", get(banners_activos))
        .route("/orden", put(reordenar))
        .route("/", get(list_banners).post(create_banner))
        .route(
            "/:id",
            get(get_banner).put(update_banner).delete(delete_banner),
        )
        .route(
            "/:id/imagen",
            post(subir_imagen).layer(DefaultBodyLimit::max(upload_limit)),
        )
}

/// Público: lo consume el carrusel de la portada
async fn banners_activos(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Banner>>>, AppError> {
    let controller = BannerController::new(state.db.clone());
    Ok(Json(controller.activos().await?))
}

async fn list_banners(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<Banner>>>, AppError> {
    let controller = BannerController::new(state.db.clone());
    Ok(Json(controller.list().await?))
}

async fn get_banner(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<Banner>>, AppError> {
    let controller = BannerController::new(state.db.clone());
    Ok(Json(controller.get(id).await?))
}

async fn create_banner(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<CrearBannerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Banner>>), AppError> {
    let controller = BannerController::new(state.db.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_banner(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    ValidatedJson(request): ValidatedJson<ActualizarBannerRequest>,
) -> Result<Json<ApiResponse<Banner>>, AppError> {
    let controller = BannerController::new(state.db.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_banner(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = BannerController::new(state.db.clone());
    Ok(Json(controller.delete(id, &state.storage).await?))
}

async fn reordenar(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<ReordenarBannersRequest>,
) -> Result<Json<ApiResponse<Vec<Banner>>>, AppError> {
    let controller = BannerController::new(state.db.clone());
    Ok(Json(controller.reordenar(request).await?))
}

async fn subir_imagen(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
    AppMultipart(multipart): AppMultipart,
) -> Result<Json<ApiResponse<Banner>>, AppError> {
    let controller = BannerController::new(state.db.clone());
    Ok(Json(controller.subir_imagen(id, multipart, &state.storage).await?))
}
