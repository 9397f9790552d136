use chrono::Utc;
use tracing::{error, info};

use crate::database::DatabaseConnection;
use crate::dto::api_response::ApiResponse;
use crate::dto::diagnostico_dto::{DiagnosticoResponse, HealthResponse};
use crate::repositories::DiagnosticoRepository;
use crate::utils::errors::AppResult;

pub struct DiagnosticoController {
    db: DatabaseConnection,
}

impl DiagnosticoController {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Liveness; la base de datos se reporta pero no hace fallar la respuesta
    pub async fn health(&self) -> ApiResponse<HealthResponse> {
        let database = match self.db.ping().await {
            Ok(()) => "ok",
            Err(e) => {
                error!("❌ Health check: base de datos no disponible: {}", e);
                "unavailable"
            }
        };

        ApiResponse::success(HealthResponse {
            status: if database == "ok" { "ok" } else { "degraded" },
            database,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
        })
    }

    /// Informe de solo lectura sobre tablas y valores enum
    pub async fn diagnostico(&self) -> AppResult<ApiResponse<DiagnosticoResponse>> {
        let repository = DiagnosticoRepository::new(self.db.clone());
        let tablas = repository.revisar_tablas().await?;
        let columnas = repository.revisar_columnas_enum().await?;

        let informe = DiagnosticoResponse::new(tablas, columnas);
        info!("🩺 Diagnóstico generado (correcto: {})", informe.correcto);
        Ok(ApiResponse::success(informe))
    }
}
