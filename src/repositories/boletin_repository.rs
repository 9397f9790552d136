use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::database::{DatabaseConnection, SqlValue, WhereClause};
use crate::dto::api_response::Paginacion;
use crate::dto::boletin_dto::BoletinFiltros;
use crate::models::boletin::{Boletin, EstadoBoletin};
use crate::services::storage_service::{CategoriaArchivo, StorageService};
use crate::utils::errors::AppResult;

const COLUMNAS: &str = "id, titulo, resumen, contenido, estado, archivo_adjunto, archivo_nombre, \
     visualizaciones, fecha_publicacion, autor_id, created_at, updated_at";

/// Valores finales de un boletín nuevo o editado
#[derive(Debug, Clone)]
pub struct DatosBoletin {
    pub titulo: String,
    pub resumen: Option<String>,
    pub contenido: String,
    pub estado: EstadoBoletin,
    pub fecha_publicacion: Option<DateTime<Utc>>,
}

pub struct BoletinRepository {
    db: DatabaseConnection,
}

impl BoletinRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// `solo_publicados` se impone sobre el filtro `estado`
    pub async fn list(
        &self,
        filtros: &BoletinFiltros,
        solo_publicados: bool,
        paginacion: Paginacion,
    ) -> AppResult<(Vec<Boletin>, i64)> {
        let mut clause = WhereClause::new();
        if solo_publicados {
            clause.push("estado = ?", EstadoBoletin::Publicado.as_str());
        } else if let Some(estado) = filtros.estado {
            clause.push("estado = ?", estado.as_str());
        }
        if let Some(buscar) = filtros.buscar.as_deref().filter(|b| !b.trim().is_empty()) {
            clause.push_search("(titulo LIKE ? OR resumen LIKE ? OR contenido LIKE ?)", buscar);
        }

        let total = self
            .db
            .count(
                &format!("SELECT COUNT(*) FROM boletines{}", clause.sql()),
                clause.params(),
            )
            .await?;

        let orden = filtros.orden.unwrap_or_default();
        let direccion = filtros.direccion.unwrap_or_default();
        let sql = format!(
            "SELECT {} FROM boletines{} ORDER BY {} {}, id {} LIMIT ? OFFSET ?",
            COLUMNAS,
            clause.sql(),
            orden.columna(),
            direccion.sql(),
            direccion.sql()
        );
        let boletines = self
            .db
            .select(&sql, &clause.params_with_page(paginacion.limit(), paginacion.offset()))
            .await?;

        Ok((boletines, total))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Boletin>> {
        let sql = format!("SELECT {} FROM boletines WHERE id = ?", COLUMNAS);
        Ok(self.db.select_one(&sql, &[id.into()]).await?)
    }

    pub async fn incrementar_visualizaciones(&self, id: i64) -> AppResult<()> {
        self.db
            .update(
                "UPDATE boletines SET visualizaciones = visualizaciones + 1 WHERE id = ?",
                &[id.into()],
            )
            .await?;
        Ok(())
    }

    /// Alta con `visualizaciones = 0`
    pub async fn create(&self, datos: &DatosBoletin, autor_id: i64) -> AppResult<i64> {
        let params: Vec<SqlValue> = vec![
            datos.titulo.trim().into(),
            datos.resumen.clone().into(),
            datos.contenido.clone().into(),
            datos.estado.as_str().into(),
            datos.fecha_publicacion.into(),
            autor_id.into(),
        ];

        Ok(self
            .db
            .insert(
                "INSERT INTO boletines (titulo, resumen, contenido, estado, visualizaciones, \
                 fecha_publicacion, autor_id, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, 0, ?, ?, UTC_TIMESTAMP(), UTC_TIMESTAMP())",
                &params,
            )
            .await?)
    }

    pub async fn update(&self, id: i64, datos: &DatosBoletin) -> AppResult<()> {
        let params: Vec<SqlValue> = vec![
            datos.titulo.trim().into(),
            datos.resumen.clone().into(),
            datos.contenido.clone().into(),
            datos.estado.as_str().into(),
            datos.fecha_publicacion.into(),
            id.into(),
        ];

        self.db
            .update(
                "UPDATE boletines SET titulo = ?, resumen = ?, contenido = ?, estado = ?, \
                 fecha_publicacion = ?, updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &params,
            )
            .await?;
        Ok(())
    }

    pub async fn set_adjunto(&self, id: i64, archivo: &str, nombre_original: &str) -> AppResult<()> {
        self.db
            .update(
                "UPDATE boletines SET archivo_adjunto = ?, archivo_nombre = ?, \
                 updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &[archivo.into(), nombre_original.into(), id.into()],
            )
            .await?;
        Ok(())
    }

    /// Borra la fila y su adjunto juntos.
    ///
    /// El adjunto se aparta antes del `COMMIT` y se borra después; si no se
    /// puede apartar o el `COMMIT` falla, la fila y el archivo se conservan.
    pub async fn delete_con_adjunto(&self, id: i64, storage: &StorageService) -> AppResult<bool> {
        let mut tx = self.db.begin().await?;

        let adjunto: Option<(Option<String>,)> =
            sqlx::query_as("SELECT archivo_adjunto FROM boletines WHERE id = ? FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((adjunto,)) = adjunto else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query("DELETE FROM boletines WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let apartado = match adjunto.as_deref().filter(|a| !a.is_empty()) {
            Some(archivo) => match storage.apartar(CategoriaArchivo::Boletines, archivo).await {
                Ok(apartado) => apartado,
                Err(e) => {
                    warn!("⚠️ Borrado del boletín {} revertido: {}", id, e);
                    tx.rollback().await?;
                    return Err(e.into());
                }
            },
            None => None,
        };

        if let Err(e) = tx.commit().await {
            if let Some(apartado) = apartado {
                if let Err(restaurar) = apartado.restaurar().await {
                    error!(
                        "❌ Boletín {} sin borrar y su adjunto no se pudo restaurar: {}",
                        id, restaurar
                    );
                }
            }
            return Err(e.into());
        }

        if let Some(apartado) = apartado {
            if let Err(e) = apartado.confirmar().await {
                warn!("⚠️ Boletín {} eliminado; el adjunto quedó apartado: {}", id, e);
            }
        }

        info!("🗑️ Boletín {} eliminado", id);
        Ok(true)
    }
}
