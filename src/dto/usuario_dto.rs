use serde::Deserialize;
use validator::Validate;

use crate::models::usuario::{EstadoUsuario, RolUsuario};
use crate::utils::validation::{validate_not_blank, validate_telefono};

/// Filtros de `GET /api/usuarios`
#[derive(Debug, Default, Deserialize)]
pub struct UsuarioFiltros {
    pub estado: Option<EstadoUsuario>,
    pub rol: Option<RolUsuario>,
    pub empresa_id: Option<i64>,
    pub activo: Option<bool>,
    pub buscar: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Alta de usuario por un administrador
#[derive(Debug, Deserialize, Validate)]
pub struct CrearUsuarioRequest {
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
    pub rol: Option<RolUsuario>,
    pub estado_usuario: Option<EstadoUsuario>,
    pub empresa_id: Option<i64>,
}

/// Actualización parcial: solo se tocan los campos presentes
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ActualizarUsuarioRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub nombre: Option<String>,
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub apellidos: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom = "validate_telefono")]
    pub telefono: Option<String>,
    #[validate(length(max = 100))]
    pub cargo: Option<String>,
    #[validate(length(max = 100))]
    pub departamento: Option<String>,
    pub rol: Option<RolUsuario>,
    pub empresa_id: Option<i64>,
    pub activo: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CambiarEstadoUsuarioRequest {
    pub estado: EstadoUsuario,
}

/// Campos que el propio usuario puede editar
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ActualizarPerfilRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub nombre: Option<String>,
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub apellidos: Option<String>,
    #[validate(custom = "validate_telefono")]
    pub telefono: Option<String>,
    #[validate(length(max = 100))]
    pub cargo: Option<String>,
    #[validate(length(max = 100))]
    pub departamento: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estado_must_be_known_value() {
        let ok: CambiarEstadoUsuarioRequest =
            serde_json::from_str(r#"{"estado":"lista_espera"}"#).unwrap();
        assert_eq!(ok.estado, EstadoUsuario::ListaEspera);

        assert!(serde_json::from_str::<CambiarEstadoUsuarioRequest>(r#"{"estado":"aprobado"}"#)
            .is_err());
    }

    #[test]
    fn test_perfil_rejects_bad_phone() {
        let request = ActualizarPerfilRequest {
            telefono: Some("llámame".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
        assert!(ActualizarPerfilRequest::default().validate().is_ok());
    }
}
