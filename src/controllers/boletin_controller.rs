use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::controllers::upload::{descartar_si_falla, recibir_archivo};
use crate::database::DatabaseConnection;
use crate::dto::api_response::{ApiResponse, ListResponse, Paginacion};
use crate::dto::boletin_dto::{
    ActualizarBoletinRequest, BoletinFiltros, BoletinResponse, CrearBoletinRequest,
};
use crate::models::boletin::{fecha_publicacion_para, Boletin, EstadoBoletin};
use crate::repositories::boletin_repository::DatosBoletin;
use crate::repositories::BoletinRepository;
use crate::services::{CategoriaArchivo, StorageService};
use crate::utils::errors::{not_found_error, AppResult};

pub struct BoletinController {
    repository: BoletinRepository,
}

impl BoletinController {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repository: BoletinRepository::new(db),
        }
    }

    /// Los no administradores solo ven boletines publicados
    pub async fn list(
        &self,
        filtros: BoletinFiltros,
        es_admin: bool,
    ) -> AppResult<ApiResponse<ListResponse<BoletinResponse>>> {
        let paginacion = Paginacion::new(filtros.page, filtros.per_page);
        let (boletines, total) = self.repository.list(&filtros, !es_admin, paginacion).await?;
        let lista = ListResponse::new(boletines, total, paginacion).map(BoletinResponse::from);
        Ok(ApiResponse::success(lista))
    }

    /// Cada lectura suma una visualización
    pub async fn get(&self, id: i64, es_admin: bool) -> AppResult<ApiResponse<BoletinResponse>> {
        let mut boletin = self.cargar(id).await?;
        if !es_admin && !boletin.esta_publicado() {
            return Err(not_found_error("Boletín", id));
        }

        self.repository.incrementar_visualizaciones(id).await?;
        boletin.visualizaciones += 1;
        Ok(ApiResponse::success(boletin.into()))
    }

    pub async fn create(
        &self,
        request: CrearBoletinRequest,
        autor_id: i64,
    ) -> AppResult<ApiResponse<BoletinResponse>> {
        let datos = datos_nuevos(request, Utc::now());
        let id = self.repository.create(&datos, autor_id).await?;

        info!("📰 Boletín {} creado ({})", id, datos.estado);
        Ok(ApiResponse::success_with_message(
            self.cargar(id).await?.into(),
            "Boletín creado",
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        cambios: ActualizarBoletinRequest,
    ) -> AppResult<ApiResponse<BoletinResponse>> {
        let actual = self.cargar(id).await?;
        let datos = datos_editados(&actual, cambios, Utc::now());
        self.repository.update(id, &datos).await?;

        Ok(ApiResponse::success_with_message(
            self.cargar(id).await?.into(),
            "Boletín actualizado",
        ))
    }

    pub async fn delete(&self, id: i64, storage: &StorageService) -> AppResult<ApiResponse<()>> {
        if !self.repository.delete_con_adjunto(id, storage).await? {
            return Err(not_found_error("Boletín", id));
        }
        Ok(ApiResponse::message("Boletín eliminado"))
    }

    /// Sustituye el adjunto; el archivo anterior se borra después de guardar el nuevo
    pub async fn subir_adjunto(
        &self,
        id: i64,
        multipart: Multipart,
        storage: &StorageService,
    ) -> AppResult<ApiResponse<BoletinResponse>> {
        let anterior = self.cargar(id).await?.archivo_adjunto;

        let archivo = recibir_archivo(multipart, storage, CategoriaArchivo::Boletines).await?;
        let registro = self
            .repository
            .set_adjunto(id, &archivo.nombre, &archivo.nombre_original)
            .await;
        descartar_si_falla(storage, CategoriaArchivo::Boletines, &archivo, registro).await?;

        if let Some(nombre) = anterior.filter(|a| !a.is_empty()) {
            if let Err(e) = storage.eliminar(CategoriaArchivo::Boletines, &nombre).await {
                warn!("⚠️ No se pudo borrar el adjunto anterior del boletín {}: {}", id, e);
            }
        }

        Ok(ApiResponse::success_with_message(
            self.cargar(id).await?.into(),
            "Adjunto actualizado",
        ))
    }

    async fn cargar(&self, id: i64) -> AppResult<Boletin> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Boletín", id))
    }
}

fn datos_nuevos(request: CrearBoletinRequest, ahora: DateTime<Utc>) -> DatosBoletin {
    let estado = request.estado.unwrap_or(EstadoBoletin::Borrador);
    DatosBoletin {
        titulo: request.titulo,
        resumen: request.resumen,
        contenido: request.contenido,
        fecha_publicacion: fecha_publicacion_para(estado, None, ahora),
        estado,
    }
}

fn datos_editados(actual: &Boletin, cambios: ActualizarBoletinRequest, ahora: DateTime<Utc>) -> DatosBoletin {
    let estado = cambios.estado.unwrap_or(actual.estado);
    DatosBoletin {
        titulo: cambios.titulo.unwrap_or_else(|| actual.titulo.clone()),
        resumen: cambios.resumen.or_else(|| actual.resumen.clone()),
        contenido: cambios.contenido.unwrap_or_else(|| actual.contenido.clone()),
        fecha_publicacion: fecha_publicacion_para(estado, actual.fecha_publicacion, ahora),
        estado,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn boletin(estado: EstadoBoletin, fecha_publicacion: Option<DateTime<Utc>>) -> Boletin {
        Boletin {
            id: 4,
            titulo: "Boletín de mayo".to_string(),
            resumen: Some("Resumen".to_string()),
            contenido: "Contenido".to_string(),
            estado,
            archivo_adjunto: None,
            archivo_nombre: None,
            visualizaciones: 12,
            fecha_publicacion,
            autor_id: Some(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_created_as_published_gets_publication_date() {
        let ahora = Utc::now();
        let request = CrearBoletinRequest {
            titulo: "Aviso".to_string(),
            resumen: None,
            contenido: "Texto".to_string(),
            estado: Some(EstadoBoletin::Publicado),
        };
        let datos = datos_nuevos(request, ahora);
        assert_eq!(datos.estado, EstadoBoletin::Publicado);
        assert_eq!(datos.fecha_publicacion, Some(ahora));
    }

    #[test]
    fn test_created_without_estado_is_draft() {
        let request = CrearBoletinRequest {
            titulo: "Aviso".to_string(),
            resumen: None,
            contenido: "Texto".to_string(),
            estado: None,
        };
        let datos = datos_nuevos(request, Utc::now());
        assert_eq!(datos.estado, EstadoBoletin::Borrador);
        assert_eq!(datos.fecha_publicacion, None);
    }

    #[test]
    fn test_first_publication_sets_date_and_keeps_other_fields() {
        let ahora = Utc::now();
        let cambios = ActualizarBoletinRequest {
            estado: Some(EstadoBoletin::Publicado),
            ..Default::default()
        };
        let datos = datos_editados(&boletin(EstadoBoletin::Borrador, None), cambios, ahora);
        assert_eq!(datos.fecha_publicacion, Some(ahora));
        assert_eq!(datos.titulo, "Boletín de mayo");
        assert_eq!(datos.resumen.as_deref(), Some("Resumen"));
    }

    #[test]
    fn test_archiving_keeps_original_publication_date() {
        let primera = Utc::now() - Duration::days(30);
        let cambios = ActualizarBoletinRequest {
            estado: Some(EstadoBoletin::Archivado),
            ..Default::default()
        };
        let datos = datos_editados(
            &boletin(EstadoBoletin::Publicado, Some(primera)),
            cambios,
            Utc::now(),
        );
        assert_eq!(datos.estado, EstadoBoletin::Archivado);
        assert_eq!(datos.fecha_publicacion, Some(primera));
    }
}
