use axum::extract::Multipart;
use tracing::{info, warn};

use crate::controllers::upload::{descartar_si_falla, recibir_archivo};
use crate::database::DatabaseConnection;
use crate::dto::api_response::{ApiResponse, ListResponse, Paginacion};
use crate::dto::empresa_dto::{ActualizarEmpresaRequest, CrearEmpresaRequest, EmpresaFiltros};
use crate::models::empresa::EmpresaConvenio;
use crate::repositories::EmpresaRepository;
use crate::services::{CategoriaArchivo, StorageService};
use crate::utils::errors::{not_found_error, AppResult};

pub struct EmpresaController {
    repository: EmpresaRepository,
}

impl EmpresaController {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repository: EmpresaRepository::new(db),
        }
    }

    /// Los no administradores solo ven empresas activas
    pub async fn list(
        &self,
        filtros: EmpresaFiltros,
        es_admin: bool,
    ) -> AppResult<ApiResponse<ListResponse<EmpresaConvenio>>> {
        let paginacion = Paginacion::new(filtros.page, filtros.per_page);
        let (empresas, total) = self.repository.list(&filtros, !es_admin, paginacion).await?;
        Ok(ApiResponse::success(ListResponse::new(empresas, total, paginacion)))
    }

    pub async fn get(&self, id: i64, es_admin: bool) -> AppResult<ApiResponse<EmpresaConvenio>> {
        let empresa = self.cargar(id).await?;
        if !empresa.activo && !es_admin {
            return Err(not_found_error("Empresa", id));
        }
        Ok(ApiResponse::success(empresa))
    }

    pub async fn create(&self, request: CrearEmpresaRequest) -> AppResult<ApiResponse<EmpresaConvenio>> {
        let id = self.repository.create(&request).await?;
        info!("🏢 Empresa {} creada", id);
        Ok(ApiResponse::success_with_message(self.cargar(id).await?, "Empresa creada"))
    }

    pub async fn update(
        &self,
        id: i64,
        cambios: ActualizarEmpresaRequest,
    ) -> AppResult<ApiResponse<EmpresaConvenio>> {
        self.cargar(id).await?;
        self.repository.update(id, &cambios).await?;
        Ok(ApiResponse::success_with_message(self.cargar(id).await?, "Empresa actualizada"))
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<()>> {
        self.cargar(id).await?;
        self.repository.desactivar(id).await?;
        info!("🏢 Empresa {} desactivada", id);
        Ok(ApiResponse::message("Empresa desactivada"))
    }

    /// Sube el logo y borra el anterior si estaba en nuestro almacenamiento
    pub async fn subir_logo(
        &self,
        id: i64,
        multipart: Multipart,
        storage: &StorageService,
    ) -> AppResult<ApiResponse<EmpresaConvenio>> {
        let anterior = self.cargar(id).await?.logo_url;

        let archivo = recibir_archivo(multipart, storage, CategoriaArchivo::Empresas).await?;
        let registro = self.repository.set_logo(id, &archivo.url).await;
        descartar_si_falla(storage, CategoriaArchivo::Empresas, &archivo, registro).await?;

        if let Some(nombre) = anterior
            .as_deref()
            .and_then(|url| storage.nombre_local(CategoriaArchivo::Empresas, url))
        {
            if let Err(e) = storage.eliminar(CategoriaArchivo::Empresas, nombre).await {
                warn!("⚠️ No se pudo borrar el logo anterior de la empresa {}: {}", id, e);
            }
        }

        Ok(ApiResponse::success_with_message(self.cargar(id).await?, "Logo actualizado"))
    }

    async fn cargar(&self, id: i64) -> AppResult<EmpresaConvenio> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Empresa", id))
    }
}
