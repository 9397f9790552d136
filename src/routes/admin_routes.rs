use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::diagnostico_controller::DiagnosticoController;
use crate::dto::api_response::ApiResponse;
use crate::dto::diagnostico_dto::{DiagnosticoResponse, HealthResponse};
use crate::middleware::auth::AdminUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_admin_router() -> Router<AppState> {
    Router::new().route("/diagnostico", get(diagnostico))
}

pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let controller = DiagnosticoController::new(state.db.clone());
    Json(controller.health().await)
}

async fn diagnostico(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<DiagnosticoResponse>>, AppError> {
    let controller = DiagnosticoController::new(state.db.clone());
    Ok(Json(controller.diagnostico().await?))
}
