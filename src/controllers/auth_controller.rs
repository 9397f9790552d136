use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tracing::{info, warn};

use crate::cache::TokenBlacklist;
use crate::dto::api_response::ApiResponse;
use crate::dto::auth_dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
    RegisterRequest, VerifyResponse,
};
use crate::middleware::auth::{cargar_usuario_activo, comprobar_estado_cuenta, validar_token, AuthenticatedUser};
use crate::models::usuario::{EstadoUsuario, RolUsuario, UsuarioResponse};
use crate::repositories::usuario_repository::NuevoUsuario;
use crate::repositories::{EmpresaRepository, UsuarioRepository};
use crate::services::{JwtService, PasswordService, SujetoToken};
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::jwt::{Claims, TokenType};

const TOKEN_TYPE: &str = "Bearer";

pub struct AuthController {
    state: AppState,
    usuarios: UsuarioRepository,
    jwt: JwtService,
    passwords: PasswordService,
    blacklist: Arc<dyn TokenBlacklist>,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            usuarios: UsuarioRepository::new(state.db.clone()),
            jwt: state.jwt.clone(),
            passwords: state.passwords,
            blacklist: state.blacklist.clone(),
        }
    }

    /// Alta pública: la cuenta queda `pendiente` hasta que un admin la apruebe
    pub async fn register(&self, request: RegisterRequest) -> AppResult<ApiResponse<UsuarioResponse>> {
        if self.usuarios.email_exists(&request.email, None).await? {
            return Err(AppError::Conflict("El email ya está registrado".to_string()));
        }

        if let Some(empresa_id) = request.empresa_id {
            if !EmpresaRepository::new(self.state.db.clone()).exists(empresa_id).await? {
                return Err(validation_error("empresa_id", "La empresa indicada no existe"));
            }
        }

        let password_hash = self.passwords.hash(&request.password).await?;
        let id = self
            .usuarios
            .create(&NuevoUsuario {
                nombre: request.nombre,
                apellidos: request.apellidos,
                email: request.email,
                password_hash,
                telefono: request.telefono,
                cargo: request.cargo,
                departamento: request.departamento,
                rol: RolUsuario::Empleado,
                estado_usuario: EstadoUsuario::Pendiente,
                empresa_id: request.empresa_id,
            })
            .await?;

        let usuario = self
            .usuarios
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Usuario {} no encontrado tras crearlo", id)))?;

        info!("👤 Registro de usuario {} ({})", usuario.id, usuario.email);
        Ok(ApiResponse::success_with_message(
            usuario.into(),
            "Registro recibido. Un administrador revisará la cuenta",
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
        let usuario = match self.usuarios.find_by_email(&request.email).await? {
            Some(usuario) => usuario,
            None => {
                warn!("🔐 Login con email desconocido");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self.passwords.verify(&request.password, &usuario.password_hash).await? {
            warn!("🔐 Contraseña incorrecta para usuario {}", usuario.id);
            return Err(AppError::InvalidCredentials);
        }

        comprobar_estado_cuenta(&usuario)?;

        let sujeto = SujetoToken::from(&usuario);
        let access = self.jwt.generate_access_token(&sujeto)?;
        let refresh = self.jwt.generate_refresh_token(&sujeto)?;

        self.usuarios.touch_ultimo_acceso(usuario.id).await?;
        info!("✅ Login de usuario {}", usuario.id);

        Ok(ApiResponse::success(LoginResponse {
            access_token: access.token,
            refresh_token: refresh.token,
            token_type: TOKEN_TYPE,
            expires_in: access.expires_in,
            refresh_expires_in: refresh.expires_in,
            usuario: usuario.into(),
        }))
    }

    /// Nuevo access token; el refresh token recibido sigue vigente
    pub async fn refresh(&self, request: RefreshTokenRequest) -> AppResult<ApiResponse<RefreshTokenResponse>> {
        let claims = validar_token(&self.state, &request.refresh_token, TokenType::Refresh).await?;
        let usuario = cargar_usuario_activo(&self.state, &claims).await?;

        let access = self.jwt.generate_access_token(&SujetoToken::from(&usuario))?;

        Ok(ApiResponse::success(RefreshTokenResponse {
            access_token: access.token,
            refresh_token: request.refresh_token,
            token_type: TOKEN_TYPE,
            expires_in: access.expires_in,
        }))
    }

    /// Revoca el access token actual y, si llega, el refresh token.
    /// Un refresh token inválido o ajeno aborta el logout sin revocar nada.
    pub async fn logout(
        &self,
        user: &AuthenticatedUser,
        refresh_token: Option<&str>,
    ) -> AppResult<ApiResponse<()>> {
        let refresh = refresh_propio(&self.jwt, user.id(), refresh_token)?;

        self.revocar(&user.claims).await?;
        if let Some(claims) = refresh {
            self.revocar(&claims).await?;
        }

        info!("👋 Logout de usuario {}", user.id());
        Ok(ApiResponse::message("Sesión cerrada"))
    }

    pub fn verify(&self, user: &AuthenticatedUser) -> AppResult<ApiResponse<VerifyResponse>> {
        let claims = &user.claims;
        let expira_en = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| AppError::Jwt("Expiración inválida en el token".to_string()))?;

        Ok(ApiResponse::success(VerifyResponse {
            valido: true,
            usuario_id: user.id(),
            email: claims.email.clone(),
            rol: claims.rol,
            empresa_id: claims.empresa_id,
            expira_en,
            segundos_restantes: claims.segundos_restantes(Utc::now().timestamp()),
        }))
    }

    pub async fn change_password(
        &self,
        user: &AuthenticatedUser,
        request: ChangePasswordRequest,
    ) -> AppResult<ApiResponse<()>> {
        if !self
            .passwords
            .verify(&request.password_actual, &user.usuario.password_hash)
            .await?
        {
            return Err(validation_error(
                "password_actual",
                "La contraseña actual no es correcta",
            ));
        }
        if request.password_actual == request.password_nueva {
            return Err(validation_error(
                "password_nueva",
                "La nueva contraseña debe ser distinta de la actual",
            ));
        }

        let password_hash = self.passwords.hash(&request.password_nueva).await?;
        self.usuarios.update_password(user.id(), &password_hash).await?;

        info!("🔑 Contraseña actualizada para usuario {}", user.id());
        Ok(ApiResponse::message("Contraseña actualizada"))
    }

    async fn revocar(&self, claims: &Claims) -> AppResult<()> {
        let ttl = claims.segundos_restantes(Utc::now().timestamp());
        if ttl == 0 {
            return Ok(());
        }
        self.blacklist
            .revoke(&claims.jti, ttl)
            .await
            .map_err(|e| AppError::Internal(format!("Error revocando token: {}", e)))
    }
}

/// Claims del refresh token enviado en el logout, si pertenece a `usuario_id`
fn refresh_propio(
    jwt: &JwtService,
    usuario_id: i64,
    refresh_token: Option<&str>,
) -> AppResult<Option<Claims>> {
    let Some(token) = refresh_token.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let claims = jwt.validate_token(token, TokenType::Refresh)?;
    if claims.usuario_id()? != usuario_id {
        return Err(AppError::Forbidden(
            "El refresh token pertenece a otro usuario".to_string(),
        ));
    }
    Ok(Some(claims))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use jsonwebtoken::Algorithm;

    use super::*;
    use crate::services::jwt_service::JwtConfig;

    fn jwt() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "una-clave-de-pruebas-de-32-caracteres!".to_string(),
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::minutes(15),
            refresh_token_duration: Duration::days(7),
        })
    }

    fn sujeto(id: i64) -> SujetoToken {
        SujetoToken {
            id,
            email: format!("usuario{}@cluster.mx", id),
            rol: RolUsuario::Empleado,
            empresa_id: None,
        }
    }

    #[test]
    fn test_logout_without_refresh_token_revokes_only_access() {
        let jwt = jwt();
        assert!(refresh_propio(&jwt, 7, None).unwrap().is_none());
        assert!(refresh_propio(&jwt, 7, Some("   ")).unwrap().is_none());
    }

    #[test]
    fn test_own_refresh_token_is_accepted() {
        let jwt = jwt();
        let refresh = jwt.generate_refresh_token(&sujeto(7)).unwrap();

        let claims = refresh_propio(&jwt, 7, Some(&refresh.token)).unwrap().unwrap();
        assert_eq!(claims.jti, refresh.jti);
    }

    #[test]
    fn test_foreign_refresh_token_is_forbidden() {
        let jwt = jwt();
        let ajeno = jwt.generate_refresh_token(&sujeto(8)).unwrap();

        match refresh_propio(&jwt, 7, Some(&ajeno.token)) {
            Err(AppError::Forbidden(_)) => {}
            other => panic!("esperaba Forbidden, obtuve {:?}", other),
        }
    }

    #[test]
    fn test_malformed_or_access_token_is_rejected() {
        let jwt = jwt();
        let access = jwt.generate_access_token(&sujeto(7)).unwrap();

        assert!(matches!(
            refresh_propio(&jwt, 7, Some("no-es-un-jwt")),
            Err(AppError::Jwt(_))
        ));
        assert!(refresh_propio(&jwt, 7, Some(&access.token)).is_err());
    }
}
