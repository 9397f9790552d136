use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::utils::validation::{validate_not_blank, validate_range, validate_telefono, validate_url_o_ruta};

#[derive(Debug, Default, Deserialize)]
pub struct EmpresaFiltros {
    pub categoria: Option<String>,
    pub buscar: Option<String>,
    pub activo: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_descuento_crear"))]
pub struct CrearEmpresaRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub nombre_empresa: String,
    pub descripcion: Option<String>,
    #[validate(length(max = 100))]
    pub categoria: Option<String>,
    #[validate(length(max = 150))]
    pub contacto_nombre: Option<String>,
    #[validate(email)]
    pub email_contacto: Option<String>,
    #[validate(custom = "validate_telefono")]
    pub telefono: Option<String>,
    #[validate(custom = "validate_url_o_ruta")]
    pub sitio_web: Option<String>,
    #[validate(length(max = 255))]
    pub direccion: Option<String>,
    #[validate(custom = "validate_url_o_ruta")]
    pub logo_url: Option<String>,
    pub descuento_porcentaje: Option<Decimal>,
    pub activo: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_descuento_actualizar"))]
pub struct ActualizarEmpresaRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub nombre_empresa: Option<String>,
    pub descripcion: Option<String>,
    #[validate(length(max = 100))]
    pub categoria: Option<String>,
    #[validate(length(max = 150))]
    pub contacto_nombre: Option<String>,
    #[validate(email)]
    pub email_contacto: Option<String>,
    #[validate(custom = "validate_telefono")]
    pub telefono: Option<String>,
    #[validate(custom = "validate_url_o_ruta")]
    pub sitio_web: Option<String>,
    #[validate(length(max = 255))]
    pub direccion: Option<String>,
    #[validate(custom = "validate_url_o_ruta")]
    pub logo_url: Option<String>,
    pub descuento_porcentaje: Option<Decimal>,
    pub activo: Option<bool>,
}

fn validate_descuento(descuento: Option<Decimal>) -> Result<(), ValidationError> {
    match descuento {
        Some(valor) => validate_range(valor, Decimal::ZERO, Decimal::ONE_HUNDRED),
        None => Ok(()),
    }
}

fn validate_descuento_crear(request: &CrearEmpresaRequest) -> Result<(), ValidationError> {
    validate_descuento(request.descuento_porcentaje)
}

fn validate_descuento_actualizar(request: &ActualizarEmpresaRequest) -> Result<(), ValidationError> {
    validate_descuento(request.descuento_porcentaje)
}
