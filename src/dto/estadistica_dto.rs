use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::estadistica::MetricaEstadistica;
use crate::utils::validation::validate_not_blank;

lazy_static! {
    static ref CLAVE_RE: Regex = Regex::new(r"^[a-z0-9_]+$").unwrap();
}

/// Valor calculado de un contador del dashboard
#[derive(Debug, Clone, Serialize)]
pub struct EstadisticaValor {
    pub clave: String,
    pub etiqueta: String,
    pub icono: Option<String>,
    pub metrica: MetricaEstadistica,
    pub valor: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CrearEstadisticaConfigRequest {
    #[validate(length(min = 1, max = 50), regex = "CLAVE_RE")]
    pub clave: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub etiqueta: String,
    #[validate(length(max = 50))]
    pub icono: Option<String>,
    pub metrica: MetricaEstadistica,
    #[validate(range(min = 0))]
    pub orden: Option<i32>,
    pub activo: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ActualizarEstadisticaConfigRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub etiqueta: Option<String>,
    #[validate(length(max = 50))]
    pub icono: Option<String>,
    pub metrica: Option<MetricaEstadistica>,
    #[validate(range(min = 0))]
    pub orden: Option<i32>,
    pub activo: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrica_must_be_allow_listed() {
        let raw = r#"{"clave":"total","etiqueta":"Total","metrica":"SELECT COUNT(*) FROM usuarios_perfil"}"#;
        assert!(serde_json::from_str::<CrearEstadisticaConfigRequest>(raw).is_err());

        let ok: CrearEstadisticaConfigRequest = serde_json::from_str(
            r#"{"clave":"eventos_mes","etiqueta":"Eventos","metrica":"eventos_proximos"}"#,
        )
        .unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_clave_is_a_slug() {
        let request: CrearEstadisticaConfigRequest = serde_json::from_str(
            r#"{"clave":"Total Usuarios","etiqueta":"Usuarios","metrica":"usuarios_activos"}"#,
        )
        .unwrap();
        assert!(request.validate().unwrap_err().field_errors().contains_key("clave"));
    }
}
