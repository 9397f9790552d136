use tracing::info;

use crate::database::{DatabaseConnection, SqlValue};
use crate::dto::banner_dto::{ActualizarBannerRequest, CrearBannerRequest, OrdenBanner};
use crate::models::banner::Banner;
use crate::repositories::placeholders;
use crate::utils::errors::{AppError, AppResult};

const COLUMNAS: &str = "id, titulo, descripcion, imagen_url, enlace_url, orden, activo, \
     fecha_inicio, fecha_fin, created_at, updated_at";

pub struct BannerRepository {
    db: DatabaseConnection,
}

impl BannerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<Banner>> {
        let sql = format!("SELECT {} FROM banner_carrusel ORDER BY orden, id", COLUMNAS);
        Ok(self.db.select(&sql, &[]).await?)
    }

    /// Banners con `activo = 1`; la ventana de vigencia se filtra en el controlador
    pub async fn list_activos(&self) -> AppResult<Vec<Banner>> {
        let sql = format!(
            "SELECT {} FROM banner_carrusel WHERE activo = 1 ORDER BY orden, id",
            COLUMNAS
        );
        Ok(self.db.select(&sql, &[]).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Banner>> {
        let sql = format!("SELECT {} FROM banner_carrusel WHERE id = ?", COLUMNAS);
        Ok(self.db.select_one(&sql, &[id.into()]).await?)
    }

    /// Sin `orden` explícito el banner va al final
    pub async fn create(&self, request: &CrearBannerRequest) -> AppResult<i64> {
        let orden = match request.orden {
            Some(orden) => orden as i64,
            None => {
                self.db
                    .count(
                        "SELECT CAST(COALESCE(MAX(orden) + 1, 0) AS SIGNED) FROM banner_carrusel",
                        &[],
                    )
                    .await?
            }
        };

        let params: Vec<SqlValue> = vec![
            request.titulo.trim().into(),
            request.descripcion.clone().into(),
            request.imagen_url.clone().into(),
            request.enlace_url.clone().into(),
            orden.into(),
            request.activo.unwrap_or(true).into(),
            request.fecha_inicio.into(),
            request.fecha_fin.into(),
        ];

        Ok(self
            .db
            .insert(
                "INSERT INTO banner_carrusel (titulo, descripcion, imagen_url, enlace_url, orden, \
                 activo, fecha_inicio, fecha_fin, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, UTC_TIMESTAMP(), UTC_TIMESTAMP())",
                &params,
            )
            .await?)
    }

    pub async fn update(&self, id: i64, cambios: &ActualizarBannerRequest) -> AppResult<()> {
        let params: Vec<SqlValue> = vec![
            cambios.titulo.as_deref().map(str::trim).into(),
            cambios.descripcion.clone().into(),
            cambios.imagen_url.clone().into(),
            cambios.enlace_url.clone().into(),
            cambios.orden.into(),
            cambios.activo.into(),
            cambios.fecha_inicio.into(),
            cambios.fecha_fin.into(),
            id.into(),
        ];

        self.db
            .update(
                "UPDATE banner_carrusel SET titulo = COALESCE(?, titulo), \
                 descripcion = COALESCE(?, descripcion), imagen_url = COALESCE(?, imagen_url), \
                 enlace_url = COALESCE(?, enlace_url), orden = COALESCE(?, orden), \
                 activo = COALESCE(?, activo), fecha_inicio = COALESCE(?, fecha_inicio), \
                 fecha_fin = COALESCE(?, fecha_fin), updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &params,
            )
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let eliminadas = self
            .db
            .delete("DELETE FROM banner_carrusel WHERE id = ?", &[id.into()])
            .await?;
        Ok(eliminadas > 0)
    }

    pub async fn set_imagen(&self, id: i64, imagen_url: &str) -> AppResult<()> {
        self.db
            .update(
                "UPDATE banner_carrusel SET imagen_url = ?, updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &[imagen_url.into(), id.into()],
            )
            .await?;
        Ok(())
    }

    /// Aplica el nuevo orden en una transacción; si falta algún id no cambia nada
    pub async fn reordenar(&self, items: &[OrdenBanner]) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let sql = format!(
            "SELECT COUNT(*) FROM banner_carrusel WHERE id IN ({}) FOR UPDATE",
            placeholders(items.len())
        );
        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        for item in items {
            query = query.bind(item.id);
        }
        let (encontrados,) = query.fetch_one(&mut *tx).await?;

        if encontrados != items.len() as i64 {
            tx.rollback().await?;
            return Err(AppError::NotFound(
                "Algún banner de la lista no existe".to_string(),
            ));
        }

        for item in items {
            sqlx::query(
                "UPDATE banner_carrusel SET orden = ?, updated_at = UTC_TIMESTAMP() WHERE id = ?",
            )
            .bind(item.orden)
            .bind(item.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("🔀 Reordenados {} banners", items.len());
        Ok(())
    }
}
