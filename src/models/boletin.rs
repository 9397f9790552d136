//! Modelo de Boletín
//!
//! Mapea la tabla `boletines`.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

string_enum!(
    EstadoBoletin {
        Borrador => "borrador",
        Publicado => "publicado",
        Archivado => "archivado",
    }
);

/// Boletín - mapea exactamente a la tabla boletines
#[derive(Debug, Clone, FromRow)]
pub struct Boletin {
    pub id: i64,
    pub titulo: String,
    pub resumen: Option<String>,
    pub contenido: String,
    pub estado: EstadoBoletin,
    pub archivo_adjunto: Option<String>,
    pub archivo_nombre: Option<String>,
    pub visualizaciones: i32,
    pub fecha_publicacion: Option<DateTime<Utc>>,
    pub autor_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Boletin {
    pub fn esta_publicado(&self) -> bool {
        self.estado == EstadoBoletin::Publicado
    }
}

/// Fecha de publicación tras fijar `estado`: se asigna la primera vez que
/// el boletín pasa a `publicado` y después no se toca.
pub fn fecha_publicacion_para(
    estado: EstadoBoletin,
    actual: Option<DateTime<Utc>>,
    ahora: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (estado, actual) {
        (_, Some(fecha)) => Some(fecha),
        (EstadoBoletin::Publicado, None) => Some(ahora),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_publicado_sets_fecha_on_creation() {
        let ahora = Utc::now();
        assert_eq!(
            fecha_publicacion_para(EstadoBoletin::Publicado, None, ahora),
            Some(ahora)
        );
        assert_eq!(fecha_publicacion_para(EstadoBoletin::Borrador, None, ahora), None);
    }

    #[test]
    fn test_fecha_publicacion_is_kept_after_first_publication() {
        let primera = Utc::now() - Duration::days(10);
        let ahora = Utc::now();
        assert_eq!(
            fecha_publicacion_para(EstadoBoletin::Publicado, Some(primera), ahora),
            Some(primera)
        );
        assert_eq!(
            fecha_publicacion_para(EstadoBoletin::Archivado, Some(primera), ahora),
            Some(primera)
        );
    }
}
