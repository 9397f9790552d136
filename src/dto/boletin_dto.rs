use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::boletin::{Boletin, EstadoBoletin};
use crate::services::storage_service::{CategoriaArchivo, StorageService};
use crate::utils::validation::validate_not_blank;

/// Columnas permitidas para ordenar el listado
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdenBoletin {
    #[default]
    FechaPublicacion,
    Titulo,
    Visualizaciones,
    CreatedAt,
}

impl OrdenBoletin {
    pub fn columna(&self) -> &'static str {
        match self {
            OrdenBoletin::FechaPublicacion => "fecha_publicacion",
            OrdenBoletin::Titulo => "titulo",
            OrdenBoletin::Visualizaciones => "visualizaciones",
            OrdenBoletin::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direccion {
    Asc,
    #[default]
    Desc,
}

impl Direccion {
    pub fn sql(&self) -> &'static str {
        match self {
            Direccion::Asc => "ASC",
            Direccion::Desc => "DESC",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BoletinFiltros {
    pub estado: Option<EstadoBoletin>,
    pub buscar: Option<String>,
    pub orden: Option<OrdenBoletin>,
    pub direccion: Option<Direccion>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CrearBoletinRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub titulo: String,
    #[validate(length(max = 500))]
    pub resumen: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub contenido: String,
    pub estado: Option<EstadoBoletin>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ActualizarBoletinRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub titulo: Option<String>,
    #[validate(length(max = 500))]
    pub resumen: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub contenido: Option<String>,
    pub estado: Option<EstadoBoletin>,
}

/// Boletín tal como lo ve el cliente: el adjunto como URL pública
#[derive(Debug, Serialize)]
pub struct BoletinResponse {
    pub id: i64,
    pub titulo: String,
    pub resumen: Option<String>,
    pub contenido: String,
    pub estado: EstadoBoletin,
    pub archivo_url: Option<String>,
    pub archivo_nombre: Option<String>,
    pub visualizaciones: i32,
    pub fecha_publicacion: Option<DateTime<Utc>>,
    pub autor_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Boletin> for BoletinResponse {
    fn from(boletin: Boletin) -> Self {
        Self {
            archivo_url: boletin
                .archivo_adjunto
                .as_deref()
                .map(|nombre| StorageService::ruta_publica(CategoriaArchivo::Boletines, nombre)),
            id: boletin.id,
            titulo: boletin.titulo,
            resumen: boletin.resumen,
            contenido: boletin.contenido,
            estado: boletin.estado,
            archivo_nombre: boletin.archivo_nombre,
            visualizaciones: boletin.visualizaciones,
            fecha_publicacion: boletin.fecha_publicacion,
            autor_id: boletin.autor_id,
            created_at: boletin.created_at,
            updated_at: boletin.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orden_only_accepts_known_columns() {
        let filtros: BoletinFiltros =
            serde_json::from_str(r#"{"orden":"visualizaciones","direccion":"asc"}"#).unwrap();
        assert_eq!(filtros.orden.unwrap().columna(), "visualizaciones");
        assert_eq!(filtros.direccion.unwrap().sql(), "ASC");

        assert!(serde_json::from_str::<BoletinFiltros>(r#"{"orden":"id; DROP TABLE boletines"}"#)
            .is_err());
    }

    #[test]
    fn test_adjunto_is_exposed_as_public_url() {
        let ahora = Utc::now();
        let boletin = Boletin {
            id: 1,
            titulo: "Boletín de mayo".to_string(),
            resumen: None,
            contenido: "Contenido".to_string(),
            estado: EstadoBoletin::Publicado,
            archivo_adjunto: Some("1715000000_abc.pdf".to_string()),
            archivo_nombre: Some("mayo.pdf".to_string()),
            visualizaciones: 3,
            fecha_publicacion: Some(ahora),
            autor_id: Some(1),
            created_at: ahora,
            updated_at: ahora,
        };

        let response = BoletinResponse::from(boletin);
        assert_eq!(
            response.archivo_url.as_deref(),
            Some("/uploads/boletines/1715000000_abc.pdf")
        );
    }
}
