use crate::database::{DatabaseConnection, SqlValue, WhereClause};
use crate::dto::api_response::Paginacion;
use crate::dto::usuario_dto::{ActualizarPerfilRequest, ActualizarUsuarioRequest, UsuarioFiltros};
use crate::models::usuario::{EstadoUsuario, RolUsuario, Usuario};
use crate::repositories::es_duplicado;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::normalizar_email;

const COLUMNAS: &str = "id, nombre, apellidos, email, password_hash, telefono, cargo, \
     departamento, rol, estado_usuario, activo, empresa_id, ultimo_acceso, created_at, updated_at";

/// Datos de una cuenta nueva (contraseña ya hasheada)
#[derive(Debug, Clone)]
pub struct NuevoUsuario {
    pub nombre: String,
    pub apellidos: String,
    pub email: String,
    pub password_hash: String,
    pub telefono: Option<String>,
    pub cargo: Option<String>,
    pub departamento: Option<String>,
    pub rol: RolUsuario,
    pub estado_usuario: EstadoUsuario,
    pub empresa_id: Option<i64>,
}

pub struct UsuarioRepository {
    db: DatabaseConnection,
}

impl UsuarioRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Usuario>> {
        let sql = format!("SELECT {} FROM usuarios_perfil WHERE id = ?", COLUMNAS);
        Ok(self.db.select_one(&sql, &[id.into()]).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Usuario>> {
        let sql = format!("SELECT {} FROM usuarios_perfil WHERE email = ?", COLUMNAS);
        Ok(self
            .db
            .select_one(&sql, &[normalizar_email(email).into()])
            .await?)
    }

    /// ¿Otro usuario (distinto de `excluir_id`) ya usa este email?
    pub async fn email_exists(&self, email: &str, excluir_id: Option<i64>) -> AppResult<bool> {
        let total = self
            .db
            .count(
                "SELECT COUNT(*) FROM usuarios_perfil WHERE email = ? AND id <> ?",
                &[normalizar_email(email).into(), excluir_id.unwrap_or(0).into()],
            )
            .await?;
        Ok(total > 0)
    }

    pub async fn list(
        &self,
        filtros: &UsuarioFiltros,
        paginacion: Paginacion,
    ) -> AppResult<(Vec<Usuario>, i64)> {
        let mut clause = WhereClause::new();
        if let Some(estado) = filtros.estado {
            clause.push("estado_usuario = ?", estado.as_str());
        }
        if let Some(rol) = filtros.rol {
            clause.push("rol = ?", rol.as_str());
        }
        if let Some(empresa_id) = filtros.empresa_id {
            clause.push("empresa_id = ?", empresa_id);
        }
        if let Some(activo) = filtros.activo {
            clause.push("activo = ?", activo);
        }
        if let Some(buscar) = filtros.buscar.as_deref().filter(|b| !b.trim().is_empty()) {
            clause.push_search("(nombre LIKE ? OR apellidos LIKE ? OR email LIKE ?)", buscar);
        }

        let total = self
            .db
            .count(
                &format!("SELECT COUNT(*) FROM usuarios_perfil{}", clause.sql()),
                clause.params(),
            )
            .await?;

        let sql = format!(
            "SELECT {} FROM usuarios_perfil{} ORDER BY apellidos, nombre, id LIMIT ? OFFSET ?",
            COLUMNAS,
            clause.sql()
        );
        let usuarios = self
            .db
            .select(&sql, &clause.params_with_page(paginacion.limit(), paginacion.offset()))
            .await?;

        Ok((usuarios, total))
    }

    pub async fn create(&self, nuevo: &NuevoUsuario) -> AppResult<i64> {
        let params: Vec<SqlValue> = vec![
            nuevo.nombre.trim().into(),
            nuevo.apellidos.trim().into(),
            normalizar_email(&nuevo.email).into(),
            nuevo.password_hash.clone().into(),
            nuevo.telefono.clone().into(),
            nuevo.cargo.clone().into(),
            nuevo.departamento.clone().into(),
            nuevo.rol.as_str().into(),
            nuevo.estado_usuario.as_str().into(),
            nuevo.empresa_id.into(),
        ];

        self.db
            .insert(
                "INSERT INTO usuarios_perfil (nombre, apellidos, email, password_hash, telefono, \
                 cargo, departamento, rol, estado_usuario, activo, empresa_id, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, UTC_TIMESTAMP(), UTC_TIMESTAMP())",
                &params,
            )
            .await
            .map_err(|e| {
                if es_duplicado(&e) {
                    AppError::Conflict("El email ya está registrado".to_string())
                } else {
                    AppError::Database(e)
                }
            })
    }

    /// Actualiza solo los campos presentes en la petición
    pub async fn update(&self, id: i64, cambios: &ActualizarUsuarioRequest) -> AppResult<()> {
        let params: Vec<SqlValue> = vec![
            cambios.nombre.as_deref().map(str::trim).into(),
            cambios.apellidos.as_deref().map(str::trim).into(),
            cambios.email.as_deref().map(normalizar_email).into(),
            cambios.telefono.clone().into(),
            cambios.cargo.clone().into(),
            cambios.departamento.clone().into(),
            cambios.rol.map(|r| r.as_str()).into(),
            cambios.empresa_id.into(),
            cambios.activo.into(),
            id.into(),
        ];

        self.db
            .update(
                "UPDATE usuarios_perfil SET nombre = COALESCE(?, nombre), \
                 apellidos = COALESCE(?, apellidos), email = COALESCE(?, email), \
                 telefono = COALESCE(?, telefono), cargo = COALESCE(?, cargo), \
                 departamento = COALESCE(?, departamento), rol = COALESCE(?, rol), \
                 empresa_id = COALESCE(?, empresa_id), activo = COALESCE(?, activo), \
                 updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &params,
            )
            .await
            .map_err(|e| {
                if es_duplicado(&e) {
                    AppError::Conflict("El email ya está registrado".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;
        Ok(())
    }

    pub async fn update_perfil(&self, id: i64, cambios: &ActualizarPerfilRequest) -> AppResult<()> {
        let params: Vec<SqlValue> = vec![
            cambios.nombre.as_deref().map(str::trim).into(),
            cambios.apellidos.as_deref().map(str::trim).into(),
            cambios.telefono.clone().into(),
            cambios.cargo.clone().into(),
            cambios.departamento.clone().into(),
            id.into(),
        ];

        self.db
            .update(
                "UPDATE usuarios_perfil SET nombre = COALESCE(?, nombre), \
                 apellidos = COALESCE(?, apellidos), telefono = COALESCE(?, telefono), \
                 cargo = COALESCE(?, cargo), departamento = COALESCE(?, departamento), \
                 updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &params,
            )
            .await?;
        Ok(())
    }

    pub async fn update_estado(&self, id: i64, estado: EstadoUsuario) -> AppResult<()> {
        self.db
            .update(
                "UPDATE usuarios_perfil SET estado_usuario = ?, updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &[estado.as_str().into(), id.into()],
            )
            .await?;
        Ok(())
    }

    pub async fn set_activo(&self, id: i64, activo: bool) -> AppResult<()> {
        self.db
            .update(
                "UPDATE usuarios_perfil SET activo = ?, updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &[activo.into(), id.into()],
            )
            .await?;
        Ok(())
    }

    pub async fn update_password(&self, id: i64, password_hash: &str) -> AppResult<()> {
        self.db
            .update(
                "UPDATE usuarios_perfil SET password_hash = ?, updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &[password_hash.into(), id.into()],
            )
            .await?;
        Ok(())
    }

    pub async fn touch_ultimo_acceso(&self, id: i64) -> AppResult<()> {
        self.db
            .update(
                "UPDATE usuarios_perfil SET ultimo_acceso = UTC_TIMESTAMP() WHERE id = ?",
                &[id.into()],
            )
            .await?;
        Ok(())
    }
}
