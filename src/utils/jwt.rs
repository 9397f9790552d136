//! Utilidades JWT
//!
//! Claims de los tokens firmados y helpers para extraerlos del header.

use serde::{Deserialize, Serialize};

use crate::{models::usuario::RolUsuario, utils::errors::AppError};

/// Tipo de token: acceso (corto) o renovación (largo)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,               // usuario_id
    pub email: String,
    pub rol: RolUsuario,
    pub empresa_id: Option<i64>,
    pub typ: TokenType,
    pub jti: String,               // identificador único para revocación
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Id numérico del usuario
    pub fn usuario_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::Jwt("ID de usuario inválido en el token".to_string()))
    }

    /// Segundos que le quedan al token (0 si ya expiró)
    pub fn segundos_restantes(&self, now: i64) -> u64 {
        (self.exp - now).max(0) as u64
    }
}

/// Validar formato de token (básico)
pub fn validate_token_format(token: &str) -> Result<(), AppError> {
    if token.is_empty() {
        return Err(AppError::Jwt("Token no puede estar vacío".to_string()));
    }

    if token.split('.').count() != 3 {
        return Err(AppError::Jwt(
            "Token debe tener 3 partes separadas por puntos".to_string(),
        ));
    }

    Ok(())
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            AppError::Unauthorized("Header Authorization debe comenzar con 'Bearer '".to_string())
        })?
        .trim();

    validate_token_format(token)?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer a.b.c").unwrap(), "a.b.c");
        assert!(extract_token_from_header("Basic dXNlcjpwYXNz").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
        assert!(extract_token_from_header("Bearer eyJzdWIiOiIxIn0").is_err());
    }

    #[test]
    fn test_segundos_restantes_never_negative() {
        let claims = Claims {
            sub: "7".to_string(),
            email: "ana@cluster.mx".to_string(),
            rol: RolUsuario::Empleado,
            empresa_id: None,
            typ: TokenType::Access,
            jti: "abc".to_string(),
            iat: 1_000,
            exp: 1_900,
        };
        assert_eq!(claims.segundos_restantes(1_000), 900);
        assert_eq!(claims.segundos_restantes(5_000), 0);
        assert_eq!(claims.usuario_id().unwrap(), 7);
    }
}
