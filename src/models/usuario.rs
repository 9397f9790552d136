//! Modelo de Usuario
//!
//! Mapea la tabla `usuarios_perfil`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

string_enum!(
    /// Rol dentro de la intranet
    RolUsuario {
        Admin => "admin",
        Empresa => "empresa",
        Empleado => "empleado",
    }
);

string_enum!(
    /// Estado de aprobación de la cuenta
    EstadoUsuario {
        Pendiente => "pendiente",
        Activo => "activo",
        Rechazado => "rechazado",
        ListaEspera => "lista_espera",
    }
);

/// Usuario - mapea exactamente a la tabla usuarios_perfil
#[derive(Debug, Clone, FromRow)]
pub struct Usuario {
    pub id: i64,
    pub nombre: String,
    pub apellidos: String,
    pub email: String,
    pub password_hash: String,
    pub telefono: Option<String>,
    pub cargo: Option<String>,
    pub departamento: Option<String>,
    pub rol: RolUsuario,
    pub estado_usuario: EstadoUsuario,
    pub activo: bool,
    pub empresa_id: Option<i64>,
    pub ultimo_acceso: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Usuario {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellidos).trim().to_string()
    }

    pub fn es_admin(&self) -> bool {
        self.rol == RolUsuario::Admin
    }
}

/// Vista pública de un usuario (sin hash de contraseña)
#[derive(Debug, Clone, Serialize)]
pub struct UsuarioResponse {
    pub id: i64,
    pub nombre: String,
    pub apellidos: String,
    pub nombre_completo: String,
    pub email: String,
    pub telefono: Option<String>,
    pub cargo: Option<String>,
    pub departamento: Option<String>,
    pub rol: RolUsuario,
    pub estado_usuario: EstadoUsuario,
    pub activo: bool,
    pub empresa_id: Option<i64>,
    pub ultimo_acceso: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Usuario> for UsuarioResponse {
    fn from(usuario: Usuario) -> Self {
        Self {
            nombre_completo: usuario.nombre_completo(),
            id: usuario.id,
            nombre: usuario.nombre,
            apellidos: usuario.apellidos,
            email: usuario.email,
            telefono: usuario.telefono,
            cargo: usuario.cargo,
            departamento: usuario.departamento,
            rol: usuario.rol,
            estado_usuario: usuario.estado_usuario,
            activo: usuario.activo,
            empresa_id: usuario.empresa_id,
            ultimo_acceso: usuario.ultimo_acceso,
            created_at: usuario.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estado_usuario_parses_only_valid_values() {
        assert_eq!("activo".parse::<EstadoUsuario>().unwrap(), EstadoUsuario::Activo);
        assert_eq!(
            "lista_espera".parse::<EstadoUsuario>().unwrap(),
            EstadoUsuario::ListaEspera
        );
        assert!("aprobado".parse::<EstadoUsuario>().is_err());
        assert!("Activo".parse::<EstadoUsuario>().is_err());
        assert_eq!(EstadoUsuario::ALL.len(), 4);
    }

    #[test]
    fn test_rol_serializes_as_lowercase() {
        assert_eq!(serde_json::to_string(&RolUsuario::Empleado).unwrap(), "\"empleado\"");
        let rol: RolUsuario = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(rol, RolUsuario::Admin);
    }
}
