//! Renovación automática del access token

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use colored::*;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::api::{ApiClient, Sesion};

/// Cada cuánto se revisa la caducidad del token
pub const INTERVALO_REVISION: std::time::Duration = std::time::Duration::from_secs(60);

/// Se renueva cuando faltan menos de 2 minutos
pub fn margen_renovacion() -> Duration {
    Duration::minutes(2)
}

pub fn debe_renovar(expira_en: DateTime<Utc>, ahora: DateTime<Utc>) -> bool {
    expira_en - ahora <= margen_renovacion()
}

pub type SesionCompartida = Arc<RwLock<Option<Sesion>>>;

/// Tarea de fondo: renueva el token a tiempo y, si falla, cierra la sesión local
pub fn iniciar_renovacion(api: ApiClient, sesion: SesionCompartida) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut intervalo = tokio::time::interval(INTERVALO_REVISION);
        loop {
            intervalo.tick().await;

            let actual = match sesion.read().await.clone() {
                Some(actual) if debe_renovar(actual.expira_en, Utc::now()) => actual,
                _ => continue,
            };

            let nueva = match api.refresh(&actual).await {
                Ok(nueva) => Some(nueva),
                Err(e) => {
                    eprintln!(
                        "{}",
                        format!("⚠️ No se pudo renovar la sesión: {}", e).bright_red()
                    );
                    None
                }
            };
            aplicar_renovacion(&mut *sesion.write().await, &actual.refresh_token, nueva);
        }
    })
}

/// Sustituye la sesión por el resultado de la renovación solo si sigue siendo
/// la misma que se renovó; un logout hecho mientras tanto se respeta.
pub fn aplicar_renovacion(
    sesion: &mut Option<Sesion>,
    refresh_usado: &str,
    nueva: Option<Sesion>,
) -> bool {
    let vigente = sesion
        .as_ref()
        .is_some_and(|s| s.refresh_token == refresh_usado);
    if vigente {
        *sesion = nueva;
    }
    vigente
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Usuario;

    fn sesion(access: &str, refresh: &str) -> Sesion {
        Sesion {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            expira_en: Utc::now() + Duration::minutes(15),
            usuario: Usuario {
                id: 7,
                nombre_completo: "Ana Pérez".to_string(),
                email: "ana@cluster.mx".to_string(),
                rol: "empleado".to_string(),
                estado_usuario: "activo".to_string(),
            },
        }
    }

    #[test]
    fn test_renewal_replaces_current_session() {
        let mut actual = Some(sesion("access-1", "refresh-1"));

        assert!(aplicar_renovacion(
            &mut actual,
            "refresh-1",
            Some(sesion("access-2", "refresh-1"))
        ));
        assert_eq!(actual.unwrap().access_token, "access-2");
    }

    #[test]
    fn test_renewal_after_logout_keeps_session_closed() {
        let mut actual: Option<Sesion> = None;

        assert!(!aplicar_renovacion(
            &mut actual,
            "refresh-1",
            Some(sesion("access-2", "refresh-1"))
        ));
        assert!(actual.is_none());
    }

    #[test]
    fn test_renewal_of_replaced_session_is_discarded() {
        let mut actual = Some(sesion("access-9", "refresh-9"));

        assert!(!aplicar_renovacion(&mut actual, "refresh-1", None));
        assert_eq!(actual.unwrap().access_token, "access-9");
    }

    #[test]
    fn test_renews_inside_margin() {
        let ahora = Utc::now();
        assert!(debe_renovar(ahora + Duration::seconds(90), ahora));
        assert!(debe_renovar(ahora + Duration::minutes(2), ahora));
    }

    #[test]
    fn test_does_not_renew_fresh_token() {
        let ahora = Utc::now();
        assert!(!debe_renovar(ahora + Duration::minutes(14), ahora));
    }

    #[test]
    fn test_expired_token_is_renewed() {
        let ahora = Utc::now();
        assert!(debe_renovar(ahora - Duration::seconds(5), ahora));
    }
}
