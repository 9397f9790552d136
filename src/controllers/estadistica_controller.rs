use futures::future::try_join_all;
use tracing::info;

use crate::database::DatabaseConnection;
use crate::dto::api_response::ApiResponse;
use crate::dto::estadistica_dto::{
    ActualizarEstadisticaConfigRequest, CrearEstadisticaConfigRequest, EstadisticaValor,
};
use crate::models::estadistica::EstadisticaConfig;
use crate::repositories::EstadisticaRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct EstadisticaController {
    repository: EstadisticaRepository,
}

impl EstadisticaController {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repository: EstadisticaRepository::new(db),
        }
    }

    /// Calcula a la vez todos los contadores activos
    pub async fn valores(&self) -> AppResult<ApiResponse<Vec<EstadisticaValor>>> {
        let configs = self.repository.list_config(true).await?;

        let valores = try_join_all(configs.into_iter().map(|config| async move {
            let valor = self.repository.calcular(config.metrica).await?;
            Ok::<_, AppError>(EstadisticaValor {
                clave: config.clave,
                etiqueta: config.etiqueta,
                icono: config.icono,
                metrica: config.metrica,
                valor,
            })
        }))
        .await?;

        Ok(ApiResponse::success(valores))
    }

    pub async fn list_config(&self) -> AppResult<ApiResponse<Vec<EstadisticaConfig>>> {
        Ok(ApiResponse::success(self.repository.list_config(false).await?))
    }

    pub async fn create(
        &self,
        request: CrearEstadisticaConfigRequest,
    ) -> AppResult<ApiResponse<EstadisticaConfig>> {
        let id = self.repository.create(&request).await?;
        info!("📊 Estadística '{}' creada ({})", request.clave, request.metrica);
        Ok(ApiResponse::success_with_message(
            self.cargar(id).await?,
            "Estadística creada",
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        cambios: ActualizarEstadisticaConfigRequest,
    ) -> AppResult<ApiResponse<EstadisticaConfig>> {
        self.cargar(id).await?;
        self.repository.update(id, &cambios).await?;
        Ok(ApiResponse::success_with_message(
            self.cargar(id).await?,
            "Estadística actualizada",
        ))
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<()>> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Estadística", id));
        }
        Ok(ApiResponse::message("Estadística eliminada"))
    }

    async fn cargar(&self, id: i64) -> AppResult<EstadisticaConfig> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Estadística", id))
    }
}
