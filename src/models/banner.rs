//! Modelo de Banner del carrusel
//!
//! Mapea la tabla `banner_carrusel`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Banner {
    pub id: i64,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub imagen_url: Option<String>,
    pub enlace_url: Option<String>,
    pub orden: i32,
    pub activo: bool,
    pub fecha_inicio: Option<NaiveDateTime>,
    pub fecha_fin: Option<NaiveDateTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Banner {
    /// Activo y dentro de su ventana de vigencia (extremos incluidos)
    pub fn vigente_en(&self, ahora: NaiveDateTime) -> bool {
        self.activo
            && self.fecha_inicio.map_or(true, |inicio| inicio <= ahora)
            && self.fecha_fin.map_or(true, |fin| fin >= ahora)
    }
}
