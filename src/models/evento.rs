//! Modelo de Evento
//!
//! Mapea las tablas `eventos` y `evento_asistentes`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

string_enum!(
    /// Estado del evento. Cualquier otro valor en la tabla es un error de lectura.
    EstadoEvento {
        Programado => "programado",
        EnCurso => "en_curso",
        Finalizado => "finalizado",
        Cancelado => "cancelado",
    }
);

string_enum!(
    TipoEvento {
        Conferencia => "conferencia",
        Taller => "taller",
        Networking => "networking",
        Capacitacion => "capacitacion",
        Social => "social",
        Otro => "otro",
    }
);

/// Evento - mapea exactamente a la tabla eventos
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Evento {
    pub id: i64,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub fecha_inicio: NaiveDateTime,
    pub fecha_fin: Option<NaiveDateTime>,
    pub ubicacion: Option<String>,
    pub capacidad_maxima: Option<i32>,
    pub capacidad_actual: i32,
    pub estado: EstadoEvento,
    pub tipo: TipoEvento,
    pub imagen_url: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Evento {
    /// Plazas libres; `None` si el evento no tiene límite
    pub fn plazas_disponibles(&self) -> Option<i32> {
        self.capacidad_maxima
            .map(|max| (max - self.capacidad_actual).max(0))
    }

    pub fn esta_completo(&self) -> bool {
        self.plazas_disponibles() == Some(0)
    }

    /// Solo los eventos programados aceptan inscripciones
    pub fn admite_inscripciones(&self) -> bool {
        self.estado == EstadoEvento::Programado
    }
}

/// Inscripción a un evento
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventoAsistente {
    pub id: i64,
    pub evento_id: i64,
    pub usuario_id: Option<i64>,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub fecha_registro: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn evento(capacidad_maxima: Option<i32>, capacidad_actual: i32, estado: EstadoEvento) -> Evento {
        let inicio = NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Evento {
            id: 1,
            titulo: "Foro de innovación".to_string(),
            descripcion: None,
            fecha_inicio: inicio,
            fecha_fin: None,
            ubicacion: Some("Auditorio".to_string()),
            capacidad_maxima,
            capacidad_actual,
            estado,
            tipo: TipoEvento::Conferencia,
            imagen_url: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_estado_evento_rejects_legacy_values() {
        assert_eq!("en_curso".parse::<EstadoEvento>().unwrap(), EstadoEvento::EnCurso);
        for legacy in ["activo", "", "programad", "EN_CURSO", "finalizad"] {
            assert!(legacy.parse::<EstadoEvento>().is_err(), "{} no debería ser válido", legacy);
        }
    }

    #[test]
    fn test_tipo_evento_round_trips_through_serde() {
        let tipo: TipoEvento = serde_json::from_str("\"capacitacion\"").unwrap();
        assert_eq!(tipo, TipoEvento::Capacitacion);
        assert!(serde_json::from_str::<TipoEvento>("\"webinar\"").is_err());
    }

    #[test]
    fn test_plazas_disponibles() {
        assert_eq!(evento(Some(50), 48, EstadoEvento::Programado).plazas_disponibles(), Some(2));
        assert_eq!(evento(None, 300, EstadoEvento::Programado).plazas_disponibles(), None);
        assert!(evento(Some(10), 10, EstadoEvento::Programado).esta_completo());
        assert!(!evento(None, 10, EstadoEvento::Programado).esta_completo());
    }

    #[test]
    fn test_only_programado_accepts_registrations() {
        assert!(evento(None, 0, EstadoEvento::Programado).admite_inscripciones());
        assert!(!evento(None, 0, EstadoEvento::Cancelado).admite_inscripciones());
        assert!(!evento(None, 0, EstadoEvento::Finalizado).admite_inscripciones());
    }
}
