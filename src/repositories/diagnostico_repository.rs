//! Consultas de solo lectura para el informe de diagnóstico

use crate::database::{DatabaseConnection, SqlValue};
use crate::dto::diagnostico_dto::{ColumnaEnumDiagnostico, TablaDiagnostico};
use crate::models::{
    EstadoBoletin, EstadoEvento, EstadoUsuario, MetricaEstadistica, RolUsuario, TipoEvento,
};
use crate::repositories::placeholders;
use crate::utils::errors::AppResult;

pub const TABLAS_REQUERIDAS: &[&str] = &[
    "usuarios_perfil",
    "empresas_convenio",
    "eventos",
    "evento_asistentes",
    "boletines",
    "banner_carrusel",
    "estadisticas_config",
];

/// Columnas con un conjunto cerrado de valores
pub fn columnas_enum() -> Vec<(&'static str, &'static str, Vec<&'static str>)> {
    vec![
        ("usuarios_perfil", "rol", RolUsuario::ALL.iter().map(|v| v.as_str()).collect()),
        (
            "usuarios_perfil",
            "estado_usuario",
            EstadoUsuario::ALL.iter().map(|v| v.as_str()).collect(),
        ),
        ("eventos", "estado", EstadoEvento::ALL.iter().map(|v| v.as_str()).collect()),
        ("eventos", "tipo", TipoEvento::ALL.iter().map(|v| v.as_str()).collect()),
        ("boletines", "estado", EstadoBoletin::ALL.iter().map(|v| v.as_str()).collect()),
        (
            "estadisticas_config",
            "metrica",
            MetricaEstadistica::ALL.iter().map(|v| v.as_str()).collect(),
        ),
    ]
}

pub struct DiagnosticoRepository {
    db: DatabaseConnection,
}

impl DiagnosticoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn tabla_existe(&self, tabla: &str) -> AppResult<bool> {
        let total = self
            .db
            .count(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND table_name = ?",
                &[tabla.into()],
            )
            .await?;
        Ok(total > 0)
    }

    pub async fn revisar_tablas(&self) -> AppResult<Vec<TablaDiagnostico>> {
        let mut tablas = Vec::with_capacity(TABLAS_REQUERIDAS.len());
        for &tabla in TABLAS_REQUERIDAS {
            let existe = self.tabla_existe(tabla).await?;
            let filas = if existe {
                Some(
                    self.db
                        .count(&format!("SELECT COUNT(*) FROM {}", tabla), &[])
                        .await?,
                )
            } else {
                None
            };
            tablas.push(TablaDiagnostico { tabla, existe, filas });
        }
        Ok(tablas)
    }

    /// Cuenta filas con valores fuera del conjunto válido; omite tablas ausentes
    pub async fn revisar_columnas_enum(&self) -> AppResult<Vec<ColumnaEnumDiagnostico>> {
        let mut columnas = Vec::new();
        for (tabla, columna, valores) in columnas_enum() {
            if !self.tabla_existe(tabla).await? {
                continue;
            }

            let sql = format!(
                "SELECT COUNT(*) FROM {tabla} WHERE {columna} IS NULL OR {columna} NOT IN ({})",
                placeholders(valores.len())
            );
            let params: Vec<SqlValue> = valores.iter().map(|v| SqlValue::from(*v)).collect();
            let filas_invalidas = self.db.count(&sql, &params).await?;

            columnas.push(ColumnaEnumDiagnostico {
                tabla,
                columna,
                valores_validos: valores,
                filas_invalidas,
            });
        }
        Ok(columnas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_columns_belong_to_required_tables() {
        for (tabla, _, valores) in columnas_enum() {
            assert!(TABLAS_REQUERIDAS.contains(&tabla), "{}", tabla);
            assert!(!valores.is_empty());
        }
    }

    #[test]
    fn test_estado_evento_valid_set() {
        let (_, _, valores) = columnas_enum()
            .into_iter()
            .find(|(t, c, _)| *t == "eventos" && *c == "estado")
            .unwrap();
        assert_eq!(valores, vec!["programado", "en_curso", "finalizado", "cancelado"]);
    }
}
