use chrono::{Days, NaiveDateTime, Utc};
use tracing::info;
use validator::{ValidationError, ValidationErrors};

use crate::database::DatabaseConnection;
use crate::dto::api_response::{ApiResponse, ListResponse, Paginacion};
use crate::dto::evento_dto::{
    validar_rango_fechas, ActualizarEventoRequest, CambiarEstadoEventoRequest, CrearEventoRequest,
    EventoFiltros, EventoResponse, InscripcionRequest,
};
use crate::models::evento::{Evento, EventoAsistente};
use crate::models::usuario::Usuario;
use crate::repositories::evento_repository::{ConsultaEventos, NuevaInscripcion};
use crate::repositories::EventoRepository;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};
use crate::utils::validation::{normalizar_email, validate_date};

pub struct EventoController {
    repository: EventoRepository,
}

impl EventoController {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repository: EventoRepository::new(db),
        }
    }

    pub async fn list(&self, filtros: EventoFiltros) -> AppResult<ApiResponse<ListResponse<EventoResponse>>> {
        let consulta = consulta_desde_filtros(&filtros, Utc::now().naive_utc())?;
        let paginacion = Paginacion::new(filtros.page, filtros.per_page);

        let (eventos, total) = self.repository.list(&consulta, paginacion).await?;
        let lista = ListResponse::new(eventos, total, paginacion).map(EventoResponse::from);
        Ok(ApiResponse::success(lista))
    }

    pub async fn get(&self, id: i64) -> AppResult<ApiResponse<EventoResponse>> {
        Ok(ApiResponse::success(self.cargar(id).await?.into()))
    }

    pub async fn create(
        &self,
        request: CrearEventoRequest,
        created_by: i64,
    ) -> AppResult<ApiResponse<EventoResponse>> {
        let id = self.repository.create(&request, created_by).await?;
        info!("📅 Evento {} creado por usuario {}", id, created_by);
        Ok(ApiResponse::success_with_message(
            self.cargar(id).await?.into(),
            "Evento creado",
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        cambios: ActualizarEventoRequest,
    ) -> AppResult<ApiResponse<EventoResponse>> {
        self.repository
            .update(id, &cambios, |actual| validar_cambios(actual, &cambios))
            .await?;
        Ok(ApiResponse::success_with_message(
            self.cargar(id).await?.into(),
            "Evento actualizado",
        ))
    }

    pub async fn cambiar_estado(
        &self,
        id: i64,
        request: CambiarEstadoEventoRequest,
    ) -> AppResult<ApiResponse<EventoResponse>> {
        let actual = self.cargar(id).await?;
        if actual.estado != request.estado {
            self.repository.update_estado(id, request.estado).await?;
            info!("📅 Evento {}: {} -> {}", id, actual.estado, request.estado);
        }
        Ok(ApiResponse::success(self.cargar(id).await?.into()))
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<()>> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Evento", id));
        }
        Ok(ApiResponse::message("Evento eliminado"))
    }

    pub async fn inscribir(
        &self,
        evento_id: i64,
        usuario: &Usuario,
        request: InscripcionRequest,
    ) -> AppResult<ApiResponse<EventoAsistente>> {
        let inscripcion = preparar_inscripcion(usuario, request);
        let asistente = self.repository.inscribir(evento_id, &inscripcion).await?;
        Ok(ApiResponse::success_with_message(asistente, "Inscripción registrada"))
    }

    pub async fn cancelar_inscripcion(
        &self,
        evento_id: i64,
        usuario: &Usuario,
    ) -> AppResult<ApiResponse<()>> {
        self.repository
            .cancelar_inscripcion(evento_id, usuario.id, &usuario.email)
            .await?;
        info!("↩️ Usuario {} canceló su inscripción al evento {}", usuario.id, evento_id);
        Ok(ApiResponse::message("Inscripción cancelada"))
    }

    pub async fn asistentes(&self, evento_id: i64) -> AppResult<ApiResponse<Vec<EventoAsistente>>> {
        self.cargar(evento_id).await?;
        Ok(ApiResponse::success(self.repository.asistentes(evento_id).await?))
    }

    async fn cargar(&self, id: i64) -> AppResult<Evento> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Evento", id))
    }
}

fn error_campo(campo: &'static str, error: ValidationError) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(campo, error);
    AppError::Validation(errors)
}

/// `hasta` incluye el día completo: se consulta hasta el inicio del día siguiente
fn consulta_desde_filtros(filtros: &EventoFiltros, ahora: NaiveDateTime) -> AppResult<ConsultaEventos> {
    let desde = filtros
        .desde
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| validate_date(d.trim()))
        .transpose()
        .map_err(|e| error_campo("desde", e))?;
    let hasta = filtros
        .hasta
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| validate_date(d.trim()))
        .transpose()
        .map_err(|e| error_campo("hasta", e))?;

    if let (Some(desde), Some(hasta)) = (desde, hasta) {
        if hasta < desde {
            return Err(validation_error("hasta", "hasta no puede ser anterior a desde"));
        }
    }

    Ok(ConsultaEventos {
        estado: filtros.estado,
        tipo: filtros.tipo,
        desde: desde.and_then(|d| d.and_hms_opt(0, 0, 0)),
        hasta: hasta
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
        proximos_desde: filtros.proximos.unwrap_or(false).then_some(ahora),
    })
}

/// Cruza los cambios con el evento guardado
fn validar_cambios(actual: &Evento, cambios: &ActualizarEventoRequest) -> AppResult<()> {
    let inicio = cambios.fecha_inicio.unwrap_or(actual.fecha_inicio);
    let fin = cambios.fecha_fin.or(actual.fecha_fin);
    validar_rango_fechas(inicio, fin).map_err(|e| error_campo("fecha_fin", e))?;

    if let Some(maxima) = cambios.capacidad_maxima {
        if maxima < actual.capacidad_actual {
            return Err(validation_error(
                "capacidad_maxima",
                "La capacidad no puede ser menor que el número de inscritos",
            ));
        }
    }
    Ok(())
}

/// Los datos que falten se toman del usuario autenticado. La inscripción
/// solo queda ligada a su cuenta si el email es el suyo.
fn preparar_inscripcion(usuario: &Usuario, request: InscripcionRequest) -> NuevaInscripcion {
    let email = request
        .email
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| usuario.email.clone());
    let propia = normalizar_email(&email) == normalizar_email(&usuario.email);

    NuevaInscripcion {
        usuario_id: propia.then_some(usuario.id),
        nombre: request
            .nombre
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| usuario.nombre_completo()),
        telefono: request.telefono.or_else(|| if propia { usuario.telefono.clone() } else { None }),
        email,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evento::{EstadoEvento, TipoEvento};
    use crate::models::usuario::{EstadoUsuario, RolUsuario};
    use chrono::NaiveDate;

    fn fecha(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn evento(capacidad_actual: i32) -> Evento {
        Evento {
            id: 3,
            titulo: "Taller".to_string(),
            descripcion: None,
            fecha_inicio: fecha(10, 9),
            fecha_fin: Some(fecha(10, 14)),
            ubicacion: None,
            capacidad_maxima: Some(30),
            capacidad_actual,
            estado: EstadoEvento::Programado,
            tipo: TipoEvento::Taller,
            imagen_url: None,
            created_by: Some(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn usuario() -> Usuario {
        Usuario {
            id: 9,
            nombre: "Luis".to_string(),
            apellidos: "Pérez".to_string(),
            email: "luis@cluster.mx".to_string(),
            password_hash: String::new(),
            telefono: Some("5512345678".to_string()),
            cargo: None,
            departamento: None,
            rol: RolUsuario::Empleado,
            estado_usuario: EstadoUsuario::Activo,
            activo: true,
            empresa_id: None,
            ultimo_acceso: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_hasta_is_inclusive_of_the_whole_day() {
        let filtros = EventoFiltros {
            desde: Some("2025-06-01".to_string()),
            hasta: Some("2025-06-30".to_string()),
            ..Default::default()
        };
        let consulta = consulta_desde_filtros(&filtros, fecha(1, 0)).unwrap();
        assert_eq!(consulta.desde, Some(fecha(1, 0)));
        assert_eq!(
            consulta.hasta,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(consulta.proximos_desde, None);
    }

    #[test]
    fn test_bad_or_reversed_dates_are_validation_errors() {
        let malo = EventoFiltros {
            desde: Some("01/06/2025".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            consulta_desde_filtros(&malo, fecha(1, 0)),
            Err(AppError::Validation(_))
        ));

        let invertido = EventoFiltros {
            desde: Some("2025-06-10".to_string()),
            hasta: Some("2025-06-01".to_string()),
            ..Default::default()
        };
        assert!(consulta_desde_filtros(&invertido, fecha(1, 0)).is_err());
    }

    #[test]
    fn test_proximos_uses_current_time() {
        let filtros = EventoFiltros {
            proximos: Some(true),
            ..Default::default()
        };
        let consulta = consulta_desde_filtros(&filtros, fecha(5, 12)).unwrap();
        assert_eq!(consulta.proximos_desde, Some(fecha(5, 12)));
    }

    #[test]
    fn test_update_checks_dates_against_stored_event() {
        let cambios = ActualizarEventoRequest {
            fecha_inicio: Some(fecha(11, 9)),
            ..Default::default()
        };
        assert!(validar_cambios(&evento(0), &cambios).is_err());

        let ok = ActualizarEventoRequest {
            fecha_fin: Some(fecha(11, 9)),
            ..Default::default()
        };
        assert!(validar_cambios(&evento(0), &ok).is_ok());
    }

    #[test]
    fn test_capacity_cannot_drop_below_registrations() {
        let cambios = ActualizarEventoRequest {
            capacidad_maxima: Some(10),
            ..Default::default()
        };
        assert!(validar_cambios(&evento(12), &cambios).is_err());
        assert!(validar_cambios(&evento(10), &cambios).is_ok());
    }

    #[test]
    fn test_inscription_defaults_to_caller() {
        let inscripcion = preparar_inscripcion(&usuario(), InscripcionRequest::default());
        assert_eq!(inscripcion.usuario_id, Some(9));
        assert_eq!(inscripcion.nombre, "Luis Pérez");
        assert_eq!(inscripcion.email, "luis@cluster.mx");
        assert_eq!(inscripcion.telefono.as_deref(), Some("5512345678"));
    }

    #[test]
    fn test_inscription_for_someone_else_is_not_linked() {
        let request = InscripcionRequest {
            nombre: Some("Invitada".to_string()),
            email: Some("invitada@empresa.mx".to_string()),
            telefono: None,
        };
        let inscripcion = preparar_inscripcion(&usuario(), request);
        assert_eq!(inscripcion.usuario_id, None);
        assert_eq!(inscripcion.nombre, "Invitada");
        assert_eq!(inscripcion.telefono, None);
    }
}
