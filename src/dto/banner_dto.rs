use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dto::evento_dto::validar_rango_fechas;
use crate::utils::validation::{
    fecha_flexible, validate_non_negative, validate_not_blank, validate_url_o_ruta,
};

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_vigencia_crear"))]
pub struct CrearBannerRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub titulo: String,
    #[validate(length(max = 500))]
    pub descripcion: Option<String>,
    #[validate(custom = "validate_url_o_ruta")]
    pub imagen_url: Option<String>,
    #[validate(custom = "validate_url_o_ruta")]
    pub enlace_url: Option<String>,
    #[validate(range(min = 0))]
    pub orden: Option<i32>,
    pub activo: Option<bool>,
    #[serde(default, deserialize_with = "fecha_flexible::opcional::deserialize")]
    pub fecha_inicio: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "fecha_flexible::opcional::deserialize")]
    pub fecha_fin: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ActualizarBannerRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub titulo: Option<String>,
    #[validate(length(max = 500))]
    pub descripcion: Option<String>,
    #[validate(custom = "validate_url_o_ruta")]
    pub imagen_url: Option<String>,
    #[validate(custom = "validate_url_o_ruta")]
    pub enlace_url: Option<String>,
    #[validate(range(min = 0))]
    pub orden: Option<i32>,
    pub activo: Option<bool>,
    #[serde(default, deserialize_with = "fecha_flexible::opcional::deserialize")]
    pub fecha_inicio: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "fecha_flexible::opcional::deserialize")]
    pub fecha_fin: Option<NaiveDateTime>,
}

fn validate_vigencia_crear(request: &CrearBannerRequest) -> Result<(), ValidationError> {
    match request.fecha_inicio {
        Some(inicio) => validar_rango_fechas(inicio, request.fecha_fin),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrdenBanner {
    pub id: i64,
    pub orden: i32,
}

/// Cuerpo de `PUT /api/banners/orden`: `[{"id": 1, "orden": 0}, ...]`
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct ReordenarBannersRequest(pub Vec<OrdenBanner>);

impl Validate for ReordenarBannersRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.0.is_empty() {
            errors.add("banners", ValidationError::new("length"));
        }
        if let Some(error) = self
            .0
            .iter()
            .find_map(|item| validate_non_negative(item.orden).err())
        {
            errors.add("orden", error);
        }
        let mut vistos = HashSet::new();
        if !self.0.iter().all(|item| vistos.insert(item.id)) {
            errors.add("id", ValidationError::new("duplicado"));
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_accepts_plain_array() {
        let request: ReordenarBannersRequest =
            serde_json::from_str(r#"[{"id":3,"orden":0},{"id":1,"orden":1}]"#).unwrap();
        assert_eq!(request.0.len(), 2);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_reorder_rejects_empty_duplicates_and_negatives() {
        let vacio = ReordenarBannersRequest(vec![]);
        assert!(vacio.validate().is_err());

        let duplicado: ReordenarBannersRequest =
            serde_json::from_str(r#"[{"id":3,"orden":0},{"id":3,"orden":1}]"#).unwrap();
        assert!(duplicado.validate().unwrap_err().field_errors().contains_key("id"));

        let negativo: ReordenarBannersRequest =
            serde_json::from_str(r#"[{"id":3,"orden":-1}]"#).unwrap();
        assert!(negativo.validate().is_err());
    }

    #[test]
    fn test_vigencia_must_be_ordered() {
        let request: CrearBannerRequest = serde_json::from_str(
            r#"{"titulo":"Promo","fecha_inicio":"2024-06-01 00:00","fecha_fin":"2024-05-01 00:00"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
