use chrono::NaiveDateTime;
use sqlx::{MySql, Transaction};
use tracing::info;

use crate::database::{DatabaseConnection, SqlValue, WhereClause};
use crate::dto::api_response::Paginacion;
use crate::dto::evento_dto::{ActualizarEventoRequest, CrearEventoRequest};
use crate::models::evento::{EstadoEvento, Evento, EventoAsistente, TipoEvento};
use crate::repositories::es_duplicado;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::normalizar_email;

const COLUMNAS: &str = "id, titulo, descripcion, fecha_inicio, fecha_fin, ubicacion, \
     capacidad_maxima, capacidad_actual, estado, tipo, imagen_url, created_by, created_at, updated_at";

const COLUMNAS_ASISTENTE: &str =
    "id, evento_id, usuario_id, nombre, email, telefono, fecha_registro";

/// Filtros ya interpretados del listado
#[derive(Debug, Clone, Default)]
pub struct ConsultaEventos {
    pub estado: Option<EstadoEvento>,
    pub tipo: Option<TipoEvento>,
    pub desde: Option<NaiveDateTime>,
    /// Límite exclusivo
    pub hasta: Option<NaiveDateTime>,
    /// Solo eventos que aún no han empezado
    pub proximos_desde: Option<NaiveDateTime>,
}

/// Datos de una inscripción nueva
#[derive(Debug, Clone)]
pub struct NuevaInscripcion {
    pub usuario_id: Option<i64>,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
}

pub struct EventoRepository {
    db: DatabaseConnection,
}

impl EventoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        consulta: &ConsultaEventos,
        paginacion: Paginacion,
    ) -> AppResult<(Vec<Evento>, i64)> {
        let mut clause = WhereClause::new();
        if let Some(estado) = consulta.estado {
            clause.push("estado = ?", estado.as_str());
        }
        if let Some(tipo) = consulta.tipo {
            clause.push("tipo = ?", tipo.as_str());
        }
        if let Some(desde) = consulta.desde {
            clause.push("fecha_inicio >= ?", desde);
        }
        if let Some(hasta) = consulta.hasta {
            clause.push("fecha_inicio < ?", hasta);
        }
        if let Some(ahora) = consulta.proximos_desde {
            clause.push("fecha_inicio >= ?", ahora);
        }

        let total = self
            .db
            .count(
                &format!("SELECT COUNT(*) FROM eventos{}", clause.sql()),
                clause.params(),
            )
            .await?;

        let sql = format!(
            "SELECT {} FROM eventos{} ORDER BY fecha_inicio, id LIMIT ? OFFSET ?",
            COLUMNAS,
            clause.sql()
        );
        let eventos = self
            .db
            .select(&sql, &clause.params_with_page(paginacion.limit(), paginacion.offset()))
            .await?;

        Ok((eventos, total))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Evento>> {
        let sql = format!("SELECT {} FROM eventos WHERE id = ?", COLUMNAS);
        Ok(self.db.select_one(&sql, &[id.into()]).await?)
    }

    pub async fn create(&self, request: &CrearEventoRequest, created_by: i64) -> AppResult<i64> {
        let params: Vec<SqlValue> = vec![
            request.titulo.trim().into(),
            request.descripcion.clone().into(),
            request.fecha_inicio.into(),
            request.fecha_fin.into(),
            request.ubicacion.clone().into(),
            request.capacidad_maxima.into(),
            request.estado.unwrap_or(EstadoEvento::Programado).as_str().into(),
            request.tipo.unwrap_or(TipoEvento::Otro).as_str().into(),
            request.imagen_url.clone().into(),
            created_by.into(),
        ];

        Ok(self
            .db
            .insert(
                "INSERT INTO eventos (titulo, descripcion, fecha_inicio, fecha_fin, ubicacion, \
                 capacidad_maxima, capacidad_actual, estado, tipo, imagen_url, created_by, \
                 created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, UTC_TIMESTAMP(), UTC_TIMESTAMP())",
                &params,
            )
            .await?)
    }

    /// Aplica los cambios con la fila bloqueada; `validar` ve el evento
    /// vigente dentro de la misma transacción que el `UPDATE`
    pub async fn update<F>(
        &self,
        id: i64,
        cambios: &ActualizarEventoRequest,
        validar: F,
    ) -> AppResult<()>
    where
        F: FnOnce(&Evento) -> AppResult<()>,
    {
        let params: Vec<SqlValue> = vec![
            cambios.titulo.as_deref().map(str::trim).into(),
            cambios.descripcion.clone().into(),
            cambios.fecha_inicio.into(),
            cambios.fecha_fin.into(),
            cambios.ubicacion.clone().into(),
            cambios.capacidad_maxima.into(),
            cambios.estado.map(|e| e.as_str()).into(),
            cambios.tipo.map(|t| t.as_str()).into(),
            cambios.imagen_url.clone().into(),
            id.into(),
        ];

        let mut tx = self.db.begin().await?;
        let actual = Self::lock_evento(&mut tx, id).await?;
        if let Err(e) = validar(&actual) {
            tx.rollback().await?;
            return Err(e);
        }

        DatabaseConnection::update_in(
            &mut tx,
            "UPDATE eventos SET titulo = COALESCE(?, titulo), \
             descripcion = COALESCE(?, descripcion), fecha_inicio = COALESCE(?, fecha_inicio), \
             fecha_fin = COALESCE(?, fecha_fin), ubicacion = COALESCE(?, ubicacion), \
             capacidad_maxima = COALESCE(?, capacidad_maxima), estado = COALESCE(?, estado), \
             tipo = COALESCE(?, tipo), imagen_url = COALESCE(?, imagen_url), \
             updated_at = UTC_TIMESTAMP() WHERE id = ?",
            &params,
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn update_estado(&self, id: i64, estado: EstadoEvento) -> AppResult<()> {
        self.db
            .update(
                "UPDATE eventos SET estado = ?, updated_at = UTC_TIMESTAMP() WHERE id = ?",
                &[estado.as_str().into(), id.into()],
            )
            .await?;
        Ok(())
    }

    /// Borra el evento y sus inscripciones en una sola transacción
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tx = self.db.begin().await?;

        let asistentes = sqlx::query("DELETE FROM evento_asistentes WHERE evento_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let eventos = sqlx::query("DELETE FROM eventos WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if eventos == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        info!("🗑️ Evento {} eliminado junto con {} inscripciones", id, asistentes);
        Ok(true)
    }

    /// Bloquea la fila del evento hasta el fin de la transacción
    async fn lock_evento(tx: &mut Transaction<'static, MySql>, id: i64) -> AppResult<Evento> {
        let sql = format!("SELECT {} FROM eventos WHERE id = ? FOR UPDATE", COLUMNAS);
        sqlx::query_as::<_, Evento>(&sql)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| not_found_error("Evento", id))
    }

    /// Inscribe a un asistente respetando estado, aforo y unicidad del email
    pub async fn inscribir(
        &self,
        evento_id: i64,
        inscripcion: &NuevaInscripcion,
    ) -> AppResult<EventoAsistente> {
        let email = normalizar_email(&inscripcion.email);
        let mut tx = self.db.begin().await?;

        let evento = Self::lock_evento(&mut tx, evento_id).await?;
        if !evento.admite_inscripciones() {
            return Err(AppError::Conflict(format!(
                "El evento no admite inscripciones (estado: {})",
                evento.estado
            )));
        }
        if evento.esta_completo() {
            return Err(AppError::Conflict("El evento está completo".to_string()));
        }

        let (ya_inscrito,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM evento_asistentes WHERE evento_id = ? AND email = ?",
        )
        .bind(evento_id)
        .bind(&email)
        .fetch_one(&mut *tx)
        .await?;
        if ya_inscrito > 0 {
            return Err(AppError::Conflict(
                "Este email ya está inscrito en el evento".to_string(),
            ));
        }

        let asistente_id = sqlx::query(
            "INSERT INTO evento_asistentes (evento_id, usuario_id, nombre, email, telefono, fecha_registro) \
             VALUES (?, ?, ?, ?, ?, UTC_TIMESTAMP())",
        )
        .bind(evento_id)
        .bind(inscripcion.usuario_id)
        .bind(inscripcion.nombre.trim())
        .bind(&email)
        .bind(inscripcion.telefono.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if es_duplicado(&e) {
                AppError::Conflict("Este email ya está inscrito en el evento".to_string())
            } else {
                AppError::Database(e)
            }
        })?
        .last_insert_id() as i64;

        sqlx::query(
            "UPDATE eventos SET capacidad_actual = capacidad_actual + 1, updated_at = UTC_TIMESTAMP() WHERE id = ?",
        )
        .bind(evento_id)
        .execute(&mut *tx)
        .await?;

        let sql = format!(
            "SELECT {} FROM evento_asistentes WHERE id = ?",
            COLUMNAS_ASISTENTE
        );
        let asistente = sqlx::query_as::<_, EventoAsistente>(&sql)
            .bind(asistente_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("✅ Inscripción {} en evento {}", asistente.email, evento_id);
        Ok(asistente)
    }

    /// Cancela la inscripción del usuario (por id o por email)
    pub async fn cancelar_inscripcion(
        &self,
        evento_id: i64,
        usuario_id: i64,
        email: &str,
    ) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        Self::lock_evento(&mut tx, evento_id).await?;

        let eliminadas = sqlx::query(
            "DELETE FROM evento_asistentes WHERE evento_id = ? AND (usuario_id = ? OR email = ?)",
        )
        .bind(evento_id)
        .bind(usuario_id)
        .bind(normalizar_email(email))
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if eliminadas == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound(
                "No existe una inscripción tuya en este evento".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE eventos SET capacidad_actual = GREATEST(CAST(capacidad_actual AS SIGNED) - ?, 0), \
             updated_at = UTC_TIMESTAMP() WHERE id = ?",
        )
        .bind(eliminadas as i64)
        .bind(evento_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn asistentes(&self, evento_id: i64) -> AppResult<Vec<EventoAsistente>> {
        let sql = format!(
            "SELECT {} FROM evento_asistentes WHERE evento_id = ? ORDER BY fecha_registro, id",
            COLUMNAS_ASISTENTE
        );
        Ok(self.db.select(&sql, &[evento_id.into()]).await?)
    }
}
