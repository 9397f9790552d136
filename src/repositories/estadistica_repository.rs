use crate::database::{DatabaseConnection, SqlValue};
use crate::dto::estadistica_dto::{ActualizarEstadisticaConfigRequest, CrearEstadisticaConfigRequest};
use crate::models::estadistica::{EstadisticaConfig, MetricaEstadistica};
use crate::repositories::es_duplicado;
use crate::utils::errors::{AppError, AppResult};

const COLUMNAS: &str = "id, clave, etiqueta, icono, metrica, orden, activo";

pub struct EstadisticaRepository {
    db: DatabaseConnection,
}

impl EstadisticaRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_config(&self, solo_activas: bool) -> AppResult<Vec<EstadisticaConfig>> {
        let filtro = if solo_activas { " WHERE activo = 1" } else { "" };
        let sql = format!(
            "SELECT {} FROM estadisticas_config{} ORDER BY orden, id",
            COLUMNAS, filtro
        );
        Ok(self.db.select(&sql, &[]).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<EstadisticaConfig>> {
        let sql = format!("SELECT {} FROM estadisticas_config WHERE id = ?", COLUMNAS);
        Ok(self.db.select_one(&sql, &[id.into()]).await?)
    }

    /// Ejecuta la consulta fija de la métrica
    pub async fn calcular(&self, metrica: MetricaEstadistica) -> AppResult<i64> {
        Ok(self.db.count(metrica.consulta(), &[]).await?)
    }

    pub async fn create(&self, request: &CrearEstadisticaConfigRequest) -> AppResult<i64> {
        let params: Vec<SqlValue> = vec![
            request.clave.clone().into(),
            request.etiqueta.trim().into(),
            request.icono.clone().into(),
            request.metrica.as_str().into(),
            request.orden.unwrap_or(0).into(),
            request.activo.unwrap_or(true).into(),
        ];

        self.db
            .insert(
                "INSERT INTO estadisticas_config (clave, etiqueta, icono, metrica, orden, activo) \
                 VALUES (?, ?, ?, ?, ?, ?)",
                &params,
            )
            .await
            .map_err(|e| {
                if es_duplicado(&e) {
                    AppError::Conflict(format!("Ya existe una estadística con clave '{}'", request.clave))
                } else {
                    AppError::Database(e)
                }
            })
    }

    pub async fn update(&self, id: i64, cambios: &ActualizarEstadisticaConfigRequest) -> AppResult<()> {
        let params: Vec<SqlValue> = vec![
            cambios.etiqueta.as_deref().map(str::trim).into(),
            cambios.icono.clone().into(),
            cambios.metrica.map(|m| m.as_str()).into(),
            cambios.orden.into(),
            cambios.activo.into(),
            id.into(),
        ];

        self.db
            .update(
                "UPDATE estadisticas_config SET etiqueta = COALESCE(?, etiqueta), \
                 icono = COALESCE(?, icono), metrica = COALESCE(?, metrica), \
                 orden = COALESCE(?, orden), activo = COALESCE(?, activo) WHERE id = ?",
                &params,
            )
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let eliminadas = self
            .db
            .delete("DELETE FROM estadisticas_config WHERE id = ?", &[id.into()])
            .await?;
        Ok(eliminadas > 0)
    }
}
