use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::evento::{EstadoEvento, Evento, TipoEvento};
use crate::utils::validation::{fecha_flexible, validate_not_blank, validate_telefono, validate_url_o_ruta};

/// Filtros de `GET /api/eventos`; `desde`/`hasta` en `YYYY-MM-DD`
#[derive(Debug, Default, Deserialize)]
pub struct EventoFiltros {
    pub estado: Option<EstadoEvento>,
    pub tipo: Option<TipoEvento>,
    pub desde: Option<String>,
    pub hasta: Option<String>,
    pub proximos: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_fechas_crear"))]
pub struct CrearEventoRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub titulo: String,
    pub descripcion: Option<String>,
    #[serde(deserialize_with = "fecha_flexible::deserialize")]
    pub fecha_inicio: NaiveDateTime,
    #[serde(default, deserialize_with = "fecha_flexible::opcional::deserialize")]
    pub fecha_fin: Option<NaiveDateTime>,
    #[validate(length(max = 255))]
    pub ubicacion: Option<String>,
    #[validate(range(min = 1))]
    pub capacidad_maxima: Option<i32>,
    pub estado: Option<EstadoEvento>,
    pub tipo: Option<TipoEvento>,
    #[validate(custom = "validate_url_o_ruta")]
    pub imagen_url: Option<String>,
}

/// Actualización parcial; las fechas se cruzan con las guardadas en el controlador
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ActualizarEventoRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "fecha_flexible::opcional::deserialize")]
    pub fecha_inicio: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "fecha_flexible::opcional::deserialize")]
    pub fecha_fin: Option<NaiveDateTime>,
    #[validate(length(max = 255))]
    pub ubicacion: Option<String>,
    #[validate(range(min = 1))]
    pub capacidad_maxima: Option<i32>,
    pub estado: Option<EstadoEvento>,
    pub tipo: Option<TipoEvento>,
    #[validate(custom = "validate_url_o_ruta")]
    pub imagen_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CambiarEstadoEventoRequest {
    pub estado: EstadoEvento,
}

/// Datos del asistente; si faltan se usan los del usuario autenticado
#[derive(Debug, Default, Deserialize, Validate)]
pub struct InscripcionRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub nombre: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom = "validate_telefono")]
    pub telefono: Option<String>,
}

/// Evento con sus plazas libres
#[derive(Debug, Serialize)]
pub struct EventoResponse {
    #[serde(flatten)]
    pub evento: Evento,
    pub plazas_disponibles: Option<i32>,
}

impl From<Evento> for EventoResponse {
    fn from(evento: Evento) -> Self {
        Self {
            plazas_disponibles: evento.plazas_disponibles(),
            evento,
        }
    }
}

/// `fecha_fin` no puede ser anterior a `fecha_inicio`
pub fn validar_rango_fechas(
    inicio: NaiveDateTime,
    fin: Option<NaiveDateTime>,
) -> Result<(), ValidationError> {
    match fin {
        Some(fin) if fin < inicio => {
            let mut error = ValidationError::new("fecha_fin");
            error.message = Some("fecha_fin debe ser posterior a fecha_inicio".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

fn validate_fechas_crear(request: &CrearEventoRequest) -> Result<(), ValidationError> {
    validar_rango_fechas(request.fecha_inicio, request.fecha_fin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fecha_fin_before_inicio_is_rejected() {
        let request: CrearEventoRequest = serde_json::from_str(
            r#"{"titulo":"Foro","fecha_inicio":"2024-05-10T10:00","fecha_fin":"2024-05-09 18:00:00"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_form_dates_without_seconds_are_accepted() {
        let request: CrearEventoRequest = serde_json::from_str(
            r#"{"titulo":"Foro","fecha_inicio":"2024-05-10T10:00","fecha_fin":"","tipo":"taller"}"#,
        )
        .unwrap();
        assert_eq!(request.fecha_fin, None);
        assert_eq!(request.tipo, Some(TipoEvento::Taller));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_unknown_estado_is_rejected_on_input() {
        let result = serde_json::from_str::<CambiarEstadoEventoRequest>(r#"{"estado":"activo"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_capacidad_must_be_positive() {
        let request = ActualizarEventoRequest {
            capacidad_maxima: Some(0),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
