use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::models::usuario::{RolUsuario, Usuario};
use crate::utils::errors::AppError;
use crate::utils::jwt::{Claims, TokenType};

/// Configuración JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_duration: Duration,
    pub refresh_token_duration: Duration,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(env: &EnvironmentConfig) -> Self {
        Self {
            secret: env.jwt_secret.clone(),
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::seconds(env.jwt_access_ttl as i64),
            refresh_token_duration: Duration::seconds(env.jwt_refresh_ttl as i64),
        }
    }
}

/// Datos del usuario que viajan dentro del token
#[derive(Debug, Clone)]
pub struct SujetoToken {
    pub id: i64,
    pub email: String,
    pub rol: RolUsuario,
    pub empresa_id: Option<i64>,
}

impl From<&Usuario> for SujetoToken {
    fn from(usuario: &Usuario) -> Self {
        Self {
            id: usuario.id,
            email: usuario.email.clone(),
            rol: usuario.rol,
            empresa_id: usuario.empresa_id,
        }
    }
}

/// Token firmado junto con su metadata
#[derive(Debug, Clone)]
pub struct TokenEmitido {
    pub token: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
    /// Segundos de vida
    pub expires_in: i64,
}

/// Servicio JWT
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Genera un token de acceso
    pub fn generate_access_token(&self, sujeto: &SujetoToken) -> Result<TokenEmitido, AppError> {
        self.generate(sujeto, TokenType::Access, self.config.access_token_duration)
    }

    /// Genera un token de renovación
    pub fn generate_refresh_token(&self, sujeto: &SujetoToken) -> Result<TokenEmitido, AppError> {
        self.generate(sujeto, TokenType::Refresh, self.config.refresh_token_duration)
    }

    fn generate(
        &self,
        sujeto: &SujetoToken,
        typ: TokenType,
        duration: Duration,
    ) -> Result<TokenEmitido, AppError> {
        let now = Utc::now();
        let expires_at = now + duration;
        let jti = Uuid::new_v4().simple().to_string();

        let claims = Claims {
            sub: sujeto.id.to_string(),
            email: sujeto.email.clone(),
            rol: sujeto.rol,
            empresa_id: sujeto.empresa_id,
            typ,
            jti: jti.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))?;

        Ok(TokenEmitido {
            token,
            jti,
            expires_at,
            expires_in: duration.num_seconds(),
        })
    }

    /// Valida firma, expiración y tipo del token
    pub fn validate_token(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Jwt("Token expirado".to_string())
                }
                _ => AppError::Jwt("Token inválido".to_string()),
            })?;

        if claims.typ != expected {
            return Err(AppError::Jwt("Tipo de token incorrecto".to_string()));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(access_secs: i64) -> JwtService {
        JwtService::new(JwtConfig {
            secret: "una-clave-de-pruebas-de-32-caracteres!".to_string(),
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::seconds(access_secs),
            refresh_token_duration: Duration::days(7),
        })
    }

    fn sujeto() -> SujetoToken {
        SujetoToken {
            id: 42,
            email: "ana@cluster.mx".to_string(),
            rol: RolUsuario::Empresa,
            empresa_id: Some(3),
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let jwt = service(900);
        let emitido = jwt.generate_access_token(&sujeto()).unwrap();
        assert_eq!(emitido.expires_in, 900);

        let claims = jwt.validate_token(&emitido.token, TokenType::Access).unwrap();
        assert_eq!(claims.usuario_id().unwrap(), 42);
        assert_eq!(claims.rol, RolUsuario::Empresa);
        assert_eq!(claims.empresa_id, Some(3));
        assert_eq!(claims.jti, emitido.jti);
    }

    #[test]
    fn test_token_type_is_enforced() {
        let jwt = service(900);
        let refresh = jwt.generate_refresh_token(&sujeto()).unwrap();
        let access = jwt.generate_access_token(&sujeto()).unwrap();

        assert!(jwt.validate_token(&refresh.token, TokenType::Access).is_err());
        assert!(jwt.validate_token(&access.token, TokenType::Refresh).is_err());
        assert!(jwt.validate_token(&refresh.token, TokenType::Refresh).is_ok());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = service(-10);
        let emitido = jwt.generate_access_token(&sujeto()).unwrap();

        match jwt.validate_token(&emitido.token, TokenType::Access) {
            Err(AppError::Jwt(msg)) => assert_eq!(msg, "Token expirado"),
            other => panic!("esperaba token expirado, obtuve {:?}", other),
        }
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let base = service(900);
        let otro = JwtService::new(JwtConfig {
            secret: "otra-clave-distinta-de-32-caracteres!!".to_string(),
            ..base.config.clone()
        });
        let emitido = otro.generate_access_token(&sujeto()).unwrap();
        assert!(base
            .validate_token(&emitido.token, TokenType::Access)
            .is_err());
    }

    #[test]
    fn test_each_token_has_unique_jti() {
        let jwt = service(900);
        let a = jwt.generate_access_token(&sujeto()).unwrap();
        let b = jwt.generate_access_token(&sujeto()).unwrap();
        assert_ne!(a.jti, b.jti);
    }
}
