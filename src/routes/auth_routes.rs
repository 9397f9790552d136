use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::api_response::ApiResponse;
use crate::dto::auth_dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, LogoutRequest, RefreshTokenRequest,
    RefreshTokenResponse, RegisterRequest, VerifyResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::usuario::UsuarioResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ValidatedJson;

/// Rutas públicas de autenticación (con rate limit)
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
}

/// Rutas de sesión que requieren token
pub fn create_session_router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/verify", get(verify))
        .route("/password", put(change_password))
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UsuarioResponse>>), AppError> {
    let controller = AuthController::new(&state);
    let response = controller.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<RefreshTokenResponse>>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.refresh(request).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Option<Json<LogoutRequest>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let controller = AuthController::new(&state);
    let response = controller
        .logout(&user, request.refresh_token.as_deref())
        .await?;
    Ok(Json(response))
}

async fn me(user: AuthenticatedUser) -> Json<ApiResponse<UsuarioResponse>> {
    Json(ApiResponse::success(user.usuario.into()))
}

async fn verify(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<VerifyResponse>>, AppError> {
    let controller = AuthController::new(&state);
    Ok(Json(controller.verify(&user)?))
}

async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.change_password(&user, request).await?;
    Ok(Json(response))
}
