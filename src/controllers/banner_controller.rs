use axum::extract::Multipart;
use chrono::Utc;
use tracing::{info, warn};
use validator::ValidationErrors;

use crate::controllers::upload::{descartar_si_falla, recibir_archivo};
use crate::database::DatabaseConnection;
use crate::dto::api_response::ApiResponse;
use crate::dto::banner_dto::{ActualizarBannerRequest, CrearBannerRequest, ReordenarBannersRequest};
use crate::dto::evento_dto::validar_rango_fechas;
use crate::models::banner::Banner;
use crate::repositories::BannerRepository;
use crate::services::{CategoriaArchivo, StorageService};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct BannerController {
    repository: BannerRepository,
}

impl BannerController {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repository: BannerRepository::new(db),
        }
    }

    /// Carrusel público: activos y dentro de su vigencia, por `orden`
    pub async fn activos(&self) -> AppResult<ApiResponse<Vec<Banner>>> {
        let ahora = Utc::now().naive_utc();
        let banners = self
            .repository
            .list_activos()
            .await?
            .into_iter()
            .filter(|banner| banner.vigente_en(ahora))
            .collect();
        Ok(ApiResponse::success(banners))
    }

    pub async fn list(&self) -> AppResult<ApiResponse<Vec<Banner>>> {
        Ok(ApiResponse::success(self.repository.list().await?))
    }

    pub async fn get(&self, id: i64) -> AppResult<ApiResponse<Banner>> {
        Ok(ApiResponse::success(self.cargar(id).await?))
    }

    pub async fn create(&self, request: CrearBannerRequest) -> AppResult<ApiResponse<Banner>> {
        let id = self.repository.create(&request).await?;
        info!("🖼️ Banner {} creado", id);
        Ok(ApiResponse::success_with_message(self.cargar(id).await?, "Banner creado"))
    }

    pub async fn update(&self, id: i64, cambios: ActualizarBannerRequest) -> AppResult<ApiResponse<Banner>> {
        let actual = self.cargar(id).await?;

        if let Some(inicio) = cambios.fecha_inicio.or(actual.fecha_inicio) {
            validar_rango_fechas(inicio, cambios.fecha_fin.or(actual.fecha_fin)).map_err(|e| {
                let mut errors = ValidationErrors::new();
                errors.add("fecha_fin", e);
                AppError::Validation(errors)
            })?;
        }

        self.repository.update(id, &cambios).await?;
        Ok(ApiResponse::success_with_message(self.cargar(id).await?, "Banner actualizado"))
    }

    /// Borra el banner y, si la imagen es nuestra, también el archivo
    pub async fn delete(&self, id: i64, storage: &StorageService) -> AppResult<ApiResponse<()>> {
        let banner = self.cargar(id).await?;
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Banner", id));
        }

        if let Some(nombre) = banner
            .imagen_url
            .as_deref()
            .and_then(|url| storage.nombre_local(CategoriaArchivo::Banners, url))
        {
            if let Err(e) = storage.eliminar(CategoriaArchivo::Banners, nombre).await {
                warn!("⚠️ Banner {} eliminado pero su imagen no: {}", id, e);
            }
        }

        info!("🗑️ Banner {} eliminado", id);
        Ok(ApiResponse::message("Banner eliminado"))
    }

    pub async fn reordenar(&self, request: ReordenarBannersRequest) -> AppResult<ApiResponse<Vec<Banner>>> {
        self.repository.reordenar(&request.0).await?;
        Ok(ApiResponse::success_with_message(
            self.repository.list().await?,
            "Orden actualizado",
        ))
    }

    pub async fn subir_imagen(
        &self,
        id: i64,
        multipart: Multipart,
        storage: &StorageService,
    ) -> AppResult<ApiResponse<Banner>> {
        let anterior = self.cargar(id).await?.imagen_url;

        let archivo = recibir_archivo(multipart, storage, CategoriaArchivo::Banners).await?;
        let registro = self.repository.set_imagen(id, &archivo.url).await;
        descartar_si_falla(storage, CategoriaArchivo::Banners, &archivo, registro).await?;

        if let Some(nombre) = anterior
            .as_deref()
            .and_then(|url| storage.nombre_local(CategoriaArchivo::Banners, url))
        {
            if let Err(e) = storage.eliminar(CategoriaArchivo::Banners, nombre).await {
                warn!("⚠️ No se pudo borrar la imagen anterior del banner {}: {}", id, e);
            }
        }

        Ok(ApiResponse::success_with_message(self.cargar(id).await?, "Imagen actualizada"))
    }

    async fn cargar(&self, id: i64) -> AppResult<Banner> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Banner", id))
    }
}
