//! Autenticación JWT
//!
//! `AuthenticatedUser` y `AdminUser` son extractores: validan el token
//! Bearer, consultan la lista de revocados y vuelven a leer el usuario de la
//! base de datos para confirmar que la cuenta sigue activa.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::{debug, error};

use crate::models::usuario::{EstadoUsuario, RolUsuario, Usuario};
use crate::repositories::UsuarioRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{extract_token_from_header, Claims, TokenType};

/// Usuario autenticado que se inyecta en los handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub usuario: Usuario,
    pub claims: Claims,
}

impl AuthenticatedUser {
    pub fn id(&self) -> i64 {
        self.usuario.id
    }

    pub fn es_admin(&self) -> bool {
        self.usuario.es_admin()
    }
}

/// Usuario autenticado con rol `admin`
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

/// Una cuenta solo opera si está habilitada y aprobada
pub fn comprobar_estado_cuenta(usuario: &Usuario) -> Result<(), AppError> {
    if !usuario.activo {
        return Err(AppError::AccountDisabled);
    }
    if usuario.estado_usuario != EstadoUsuario::Activo {
        return Err(AppError::AccountInactive(usuario.estado_usuario));
    }
    Ok(())
}

/// Valida firma, tipo y revocación de un token
pub async fn validar_token(
    state: &AppState,
    token: &str,
    tipo: TokenType,
) -> Result<Claims, AppError> {
    let claims = state.jwt.validate_token(token, tipo)?;

    let revocado = state.blacklist.is_revoked(&claims.jti).await.map_err(|e| {
        error!("❌ Error consultando tokens revocados: {}", e);
        AppError::Internal(e.to_string())
    })?;
    if revocado {
        debug!("Token {} revocado", claims.jti);
        return Err(AppError::Unauthorized("Token revocado".to_string()));
    }

    Ok(claims)
}

/// Carga el usuario del token y comprueba que puede operar
pub async fn cargar_usuario_activo(state: &AppState, claims: &Claims) -> Result<Usuario, AppError> {
    let usuario = UsuarioRepository::new(state.db.clone())
        .find_by_id(claims.usuario_id()?)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    comprobar_estado_cuenta(&usuario)?;
    Ok(usuario)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

        let token = extract_token_from_header(auth_header)?;
        let claims = validar_token(state, token, TokenType::Access).await?;
        let usuario = cargar_usuario_activo(state, &claims).await?;

        Ok(AuthenticatedUser { usuario, claims })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if user.usuario.rol != RolUsuario::Admin {
            return Err(AppError::Forbidden(
                "Se requieren permisos de administrador".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn usuario(estado: EstadoUsuario, activo: bool) -> Usuario {
        Usuario {
            id: 1,
            nombre: "Ana".to_string(),
            apellidos: "López".to_string(),
            email: "ana@cluster.mx".to_string(),
            password_hash: String::new(),
            telefono: None,
            cargo: None,
            departamento: None,
            rol: RolUsuario::Empleado,
            estado_usuario: estado,
            activo,
            empresa_id: None,
            ultimo_acceso: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_active_account_passes() {
        assert!(comprobar_estado_cuenta(&usuario(EstadoUsuario::Activo, true)).is_ok());
    }

    #[test]
    fn test_non_active_states_are_account_inactive() {
        for estado in [
            EstadoUsuario::Pendiente,
            EstadoUsuario::Rechazado,
            EstadoUsuario::ListaEspera,
        ] {
            match comprobar_estado_cuenta(&usuario(estado, true)) {
                Err(AppError::AccountInactive(e)) => assert_eq!(e, estado),
                other => panic!("esperaba cuenta inactiva, obtuve {:?}", other),
            }
        }
    }

    #[test]
    fn test_disabled_account_is_reported_first() {
        assert!(matches!(
            comprobar_estado_cuenta(&usuario(EstadoUsuario::Pendiente, false)),
            Err(AppError::AccountDisabled)
        ));
    }
}
