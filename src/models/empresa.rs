//! Modelo de Empresa en convenio
//!
//! Mapea la tabla `empresas_convenio`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Empresa con convenio de descuento
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmpresaConvenio {
    pub id: i64,
    pub nombre_empresa: String,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    pub contacto_nombre: Option<String>,
    pub email_contacto: Option<String>,
    pub telefono: Option<String>,
    pub sitio_web: Option<String>,
    pub direccion: Option<String>,
    pub logo_url: Option<String>,
    pub descuento_porcentaje: Option<Decimal>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
