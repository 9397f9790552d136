use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::usuario::{RolUsuario, UsuarioResponse};
use crate::utils::validation::{validate_not_blank, validate_telefono};

// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub nombre: String,
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub apellidos: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
    #[validate(custom = "validate_telefono")]
    pub telefono: Option<String>,
    #[validate(length(max = 100))]
    pub cargo: Option<String>,
    #[validate(length(max = 100))]
    pub departamento: Option<String>,
    pub empresa_id: Option<i64>,
}

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Cuerpo opcional del logout
#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub password_actual: String,
    #[validate(length(min = 8, max = 72))]
    pub password_nueva: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
    pub usuario: UsuarioResponse,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    /// El mismo refresh token recibido; sigue siendo válido
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Resumen de los claims del token presentado
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valido: bool,
    pub usuario_id: i64,
    pub email: String,
    pub rol: RolUsuario,
    pub empresa_id: Option<i64>,
    pub expira_en: DateTime<Utc>,
    pub segundos_restantes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_requires_valid_email_and_password_length() {
        let request = RegisterRequest {
            nombre: "Ana".to_string(),
            apellidos: "López".to_string(),
            email: "no-es-email".to_string(),
            password: "corta".to_string(),
            telefono: Some("55 1234 5678".to_string()),
            cargo: None,
            departamento: None,
            empresa_id: None,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("telefono"));
    }

    #[test]
    fn test_blank_nombre_is_rejected() {
        let request = RegisterRequest {
            nombre: "   ".to_string(),
            apellidos: "López".to_string(),
            email: "ana@cluster.mx".to_string(),
            password: "secreto123".to_string(),
            telefono: None,
            cargo: None,
            departamento: None,
            empresa_id: None,
        };

        assert!(request.validate().unwrap_err().field_errors().contains_key("nombre"));
    }
}
