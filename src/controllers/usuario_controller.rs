use tracing::info;

use crate::database::DatabaseConnection;
use crate::dto::api_response::{ApiResponse, ListResponse, Paginacion};
use crate::dto::usuario_dto::{
    ActualizarPerfilRequest, ActualizarUsuarioRequest, CambiarEstadoUsuarioRequest,
    CrearUsuarioRequest, UsuarioFiltros,
};
use crate::models::usuario::{EstadoUsuario, RolUsuario, Usuario, UsuarioResponse};
use crate::repositories::usuario_repository::NuevoUsuario;
use crate::repositories::{EmpresaRepository, UsuarioRepository};
use crate::services::PasswordService;
use crate::utils::errors::{forbidden_error, not_found_error, validation_error, AppError, AppResult};

pub struct UsuarioController {
    db: DatabaseConnection,
    repository: UsuarioRepository,
}

impl UsuarioController {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repository: UsuarioRepository::new(db.clone()),
            db,
        }
    }

    pub async fn list(&self, filtros: UsuarioFiltros) -> AppResult<ApiResponse<ListResponse<UsuarioResponse>>> {
        let paginacion = Paginacion::new(filtros.page, filtros.per_page);
        let (usuarios, total) = self.repository.list(&filtros, paginacion).await?;
        let lista = ListResponse::new(usuarios, total, paginacion).map(UsuarioResponse::from);
        Ok(ApiResponse::success(lista))
    }

    pub async fn get(&self, id: i64) -> AppResult<ApiResponse<UsuarioResponse>> {
        Ok(ApiResponse::success(self.cargar(id).await?.into()))
    }

    pub async fn create(
        &self,
        request: CrearUsuarioRequest,
        passwords: PasswordService,
    ) -> AppResult<ApiResponse<UsuarioResponse>> {
        if self.repository.email_exists(&request.email, None).await? {
            return Err(AppError::Conflict("El email ya está registrado".to_string()));
        }
        self.comprobar_empresa(request.empresa_id).await?;

        let password_hash = passwords.hash(&request.password).await?;
        let id = self
            .repository
            .create(&NuevoUsuario {
                nombre: request.nombre,
                apellidos: request.apellidos,
                email: request.email,
                password_hash,
                telefono: request.telefono,
                cargo: request.cargo,
                departamento: request.departamento,
                rol: request.rol.unwrap_or(RolUsuario::Empleado),
                estado_usuario: request.estado_usuario.unwrap_or(EstadoUsuario::Activo),
                empresa_id: request.empresa_id,
            })
            .await?;

        info!("👤 Usuario {} creado por un administrador", id);
        Ok(ApiResponse::success_with_message(
            self.cargar(id).await?.into(),
            "Usuario creado",
        ))
    }

    pub async fn update(
        &self,
        admin_id: i64,
        id: i64,
        cambios: ActualizarUsuarioRequest,
    ) -> AppResult<ApiResponse<UsuarioResponse>> {
        self.cargar(id).await?;

        if id == admin_id && cambios.activo == Some(false) {
            return Err(forbidden_error("deshabilitar la cuenta", "es la cuenta en uso"));
        }
        if let Some(email) = cambios.email.as_deref() {
            if self.repository.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("El email ya está registrado".to_string()));
            }
        }
        self.comprobar_empresa(cambios.empresa_id).await?;

        self.repository.update(id, &cambios).await?;
        Ok(ApiResponse::success_with_message(
            self.cargar(id).await?.into(),
            "Usuario actualizado",
        ))
    }

    /// Aprobar, rechazar o mover a lista de espera
    pub async fn cambiar_estado(
        &self,
        id: i64,
        request: CambiarEstadoUsuarioRequest,
    ) -> AppResult<ApiResponse<UsuarioResponse>> {
        let usuario = self.cargar(id).await?;
        if usuario.estado_usuario != request.estado {
            self.repository.update_estado(id, request.estado).await?;
            info!(
                "📋 Usuario {}: {} -> {}",
                id, usuario.estado_usuario, request.estado
            );
        }
        Ok(ApiResponse::success(self.cargar(id).await?.into()))
    }

    /// Baja lógica (`activo = 0`)
    pub async fn desactivar(&self, admin_id: i64, id: i64) -> AppResult<ApiResponse<()>> {
        if id == admin_id {
            return Err(forbidden_error("deshabilitar la cuenta", "es la cuenta en uso"));
        }
        self.cargar(id).await?;
        self.repository.set_activo(id, false).await?;

        info!("🚫 Usuario {} deshabilitado", id);
        Ok(ApiResponse::message("Usuario deshabilitado"))
    }

    pub fn perfil(&self, usuario: Usuario) -> ApiResponse<UsuarioResponse> {
        ApiResponse::success(usuario.into())
    }

    pub async fn actualizar_perfil(
        &self,
        id: i64,
        cambios: ActualizarPerfilRequest,
    ) -> AppResult<ApiResponse<UsuarioResponse>> {
        self.repository.update_perfil(id, &cambios).await?;
        Ok(ApiResponse::success_with_message(
            self.cargar(id).await?.into(),
            "Perfil actualizado",
        ))
    }

    async fn cargar(&self, id: i64) -> AppResult<Usuario> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Usuario", id))
    }

    async fn comprobar_empresa(&self, empresa_id: Option<i64>) -> AppResult<()> {
        if let Some(empresa_id) = empresa_id {
            if !EmpresaRepository::new(self.db.clone()).exists(empresa_id).await? {
                return Err(validation_error("empresa_id", "La empresa indicada no existe"));
            }
        }
        Ok(())
    }
}
