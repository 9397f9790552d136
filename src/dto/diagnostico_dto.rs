use chrono::{DateTime, Utc};
use serde::Serialize;

/// Estado de una tabla requerida
#[derive(Debug, Clone, Serialize)]
pub struct TablaDiagnostico {
    pub tabla: &'static str,
    pub existe: bool,
    pub filas: Option<i64>,
}

/// Filas con un valor fuera del conjunto válido de una columna enum
#[derive(Debug, Clone, Serialize)]
pub struct ColumnaEnumDiagnostico {
    pub tabla: &'static str,
    pub columna: &'static str,
    pub valores_validos: Vec<&'static str>,
    pub filas_invalidas: i64,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticoResponse {
    /// `true` si existen todas las tablas y no hay valores inválidos
    pub correcto: bool,
    pub tablas: Vec<TablaDiagnostico>,
    pub columnas_enum: Vec<ColumnaEnumDiagnostico>,
    pub generado_en: DateTime<Utc>,
}

impl DiagnosticoResponse {
    pub fn new(tablas: Vec<TablaDiagnostico>, columnas_enum: Vec<ColumnaEnumDiagnostico>) -> Self {
        let correcto = tablas.iter().all(|t| t.existe)
            && columnas_enum.iter().all(|c| c.filas_invalidas == 0);
        Self {
            correcto,
            tablas,
            columnas_enum,
            generado_en: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}
