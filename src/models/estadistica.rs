//! Configuración de estadísticas del dashboard
//!
//! Cada contador configurado apunta a una métrica de una lista cerrada;
//! la consulta SQL de cada métrica vive en el código, nunca en la tabla.

use serde::Serialize;
use sqlx::FromRow;

string_enum!(
    MetricaEstadistica {
        UsuariosActivos => "usuarios_activos",
        UsuariosPendientes => "usuarios_pendientes",
        EmpresasActivas => "empresas_activas",
        EventosProximos => "eventos_proximos",
        InscripcionesTotales => "inscripciones_totales",
        BoletinesPublicados => "boletines_publicados",
        VisualizacionesBoletines => "visualizaciones_boletines",
        BannersActivos => "banners_activos",
    }
);

impl MetricaEstadistica {
    /// Consulta fija que devuelve un único `BIGINT`
    pub fn consulta(&self) -> &'static str {
        match self {
            MetricaEstadistica::UsuariosActivos => {
                "SELECT COUNT(*) FROM usuarios_perfil WHERE estado_usuario = 'activo' AND activo = 1"
            }
            MetricaEstadistica::UsuariosPendientes => {
                "SELECT COUNT(*) FROM usuarios_perfil WHERE estado_usuario = 'pendiente' AND activo = 1"
            }
            MetricaEstadistica::EmpresasActivas => {
                "SELECT COUNT(*) FROM empresas_convenio WHERE activo = 1"
            }
            MetricaEstadistica::EventosProximos => {
                "SELECT COUNT(*) FROM eventos WHERE estado = 'programado' AND fecha_inicio >= UTC_TIMESTAMP()"
            }
            MetricaEstadistica::InscripcionesTotales => "SELECT COUNT(*) FROM evento_asistentes",
            MetricaEstadistica::BoletinesPublicados => {
                "SELECT COUNT(*) FROM boletines WHERE estado = 'publicado'"
            }
            MetricaEstadistica::VisualizacionesBoletines => {
                "SELECT CAST(COALESCE(SUM(visualizaciones), 0) AS SIGNED) FROM boletines"
            }
            MetricaEstadistica::BannersActivos => {
                "SELECT COUNT(*) FROM banner_carrusel WHERE activo = 1 \
                 AND (fecha_inicio IS NULL OR fecha_inicio <= UTC_TIMESTAMP()) \
                 AND (fecha_fin IS NULL OR fecha_fin >= UTC_TIMESTAMP())"
            }
        }
    }
}

/// Fila de `estadisticas_config`
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EstadisticaConfig {
    pub id: i64,
    pub clave: String,
    pub etiqueta: String,
    pub icono: Option<String>,
    pub metrica: MetricaEstadistica,
    pub orden: i32,
    pub activo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_metric_has_a_single_select() {
        for metrica in MetricaEstadistica::ALL {
            let sql = metrica.consulta();
            assert!(sql.starts_with("SELECT "), "{}", metrica);
            assert!(!sql.contains(';'), "{}", metrica);
            assert!(!sql.contains('?'), "{}", metrica);
        }
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        assert!("SELECT * FROM usuarios_perfil".parse::<MetricaEstadistica>().is_err());
        assert_eq!(
            "banners_activos".parse::<MetricaEstadistica>().unwrap(),
            MetricaEstadistica::BannersActivos
        );
    }
}
