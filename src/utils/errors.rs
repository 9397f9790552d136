//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión al sobre JSON `{"ok": false, "error": {...}}`.

use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::usuario::EstadoUsuario;
use crate::services::storage_service::StorageError;

/// Códigos estables de error expuestos al cliente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    BadRequest,
    InvalidCredentials,
    Unauthorized,
    AccountInactive,
    AccountDisabled,
    Forbidden,
    NotFound,
    Conflict,
    PayloadTooLarge,
    UnsupportedMediaType,
    RateLimited,
    Database,
    Storage,
    Internal,
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Cuenta no activa (estado: {0})")]
    AccountInactive(EstadoUsuario),

    #[error("Cuenta deshabilitada")]
    AccountDisabled,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Cuerpo del error dentro del sobre
#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: ErrorKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// Sobre de error para la API
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    ok: bool,
    error: ErrorBody,
    timestamp: DateTime<Utc>,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Database(_) => ErrorKind::Database,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AppError::Unauthorized(_) | AppError::Jwt(_) => ErrorKind::Unauthorized,
            AppError::AccountInactive(_) => ErrorKind::AccountInactive,
            AppError::AccountDisabled => ErrorKind::AccountDisabled,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::PayloadTooLarge(_) => ErrorKind::PayloadTooLarge,
            AppError::UnsupportedMediaType(_) => ErrorKind::UnsupportedMediaType,
            AppError::RateLimitExceeded => ErrorKind::RateLimited,
            AppError::Storage(_) => ErrorKind::Storage,
            AppError::Hash(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidCredentials | ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::AccountInactive | ErrorKind::AccountDisabled | ErrorKind::Forbidden => {
                StatusCode::FORBIDDEN
            }
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Database | ErrorKind::Storage | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Mensaje y detalles visibles para el cliente.
    /// Los errores internos nunca exponen el detalle técnico.
    fn public_parts(&self) -> (String, Option<serde_json::Value>) {
        match self {
            AppError::Database(_) => (
                "Error al acceder a la base de datos".to_string(),
                None,
            ),
            AppError::Validation(e) => (
                "Los datos enviados no son válidos".to_string(),
                Some(json!(e)),
            ),
            AppError::InvalidCredentials => ("Credenciales inválidas".to_string(), None),
            AppError::AccountInactive(estado) => (
                format!("La cuenta no está activa (estado: {})", estado),
                Some(json!({ "estado": estado })),
            ),
            AppError::AccountDisabled => ("La cuenta ha sido deshabilitada".to_string(), None),
            AppError::RateLimitExceeded => (
                "Demasiadas solicitudes. Inténtelo de nuevo más tarde".to_string(),
                None,
            ),
            AppError::Hash(_) => (
                "Error al procesar las credenciales".to_string(),
                None,
            ),
            AppError::Storage(_) => ("Error al guardar el archivo".to_string(), None),
            AppError::Internal(_) => ("Error inesperado del servidor".to_string(), None),
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Jwt(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::UnsupportedMediaType(msg) => (msg.clone(), None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("❌ {}", self);
        } else {
            warn!("⚠️ {}", self);
        }

        let (message, details) = self.public_parts();
        let body = ErrorEnvelope {
            ok: false,
            error: ErrorBody {
                kind: self.kind(),
                message,
                details,
            },
            timestamp: Utc::now(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ArchivoDemasiadoGrande { .. } => AppError::PayloadTooLarge(err.to_string()),
            StorageError::ExtensionNoPermitida { .. } | StorageError::SinExtension => {
                AppError::UnsupportedMediaType(err.to_string())
            }
            StorageError::ArchivoVacio | StorageError::NombreInvalido(_) => {
                AppError::BadRequest(err.to_string())
            }
            StorageError::Io(e) => AppError::Storage(e.to_string()),
        }
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(Cow::Borrowed(message));

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} con id {} no encontrado", resource, id))
}

/// Función helper para crear errores de acceso prohibido
pub fn forbidden_error(operation: &str, reason: &str) -> AppError {
    AppError::Forbidden(format!("No se puede {}: {}", operation, reason))
}
