//! Conexión compartida a MySQL
//!
//! `Database` envuelve el pool de SQLx y ofrece los helpers
//! `select`/`select_one`/`insert`/`update`/`delete` con parámetros
//! posicionales. Se crea una sola vez al arrancar y viaja en `AppState`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::{MySql, MySqlPool, MySqlRow};
use sqlx::{FromRow, Transaction};
use tracing::info;

use crate::config::database::{mask_url, DatabaseConfig};

/// Valor de un parámetro posicional (`?`) de una consulta
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
    Decimal(Decimal),
    Bool(bool),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Null,
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value as i64)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        SqlValue::Decimal(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::DateTime(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Enlaza una lista de `SqlValue` a una consulta de SQLx (`query` o `query_as`)
macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::Text(v) => query.bind(v.clone()),
                SqlValue::Decimal(v) => query.bind(*v),
                SqlValue::Bool(v) => query.bind(*v),
                SqlValue::DateTime(v) => query.bind(*v),
                SqlValue::Timestamp(v) => query.bind(*v),
                SqlValue::Date(v) => query.bind(*v),
                SqlValue::Null => query.bind(Option::<String>::None),
            };
        }
        query
    }};
}

/// Conexión compartida a la base de datos
#[derive(Clone, Debug)]
pub struct DatabaseConnection {
    pool: MySqlPool,
}

impl DatabaseConnection {
    /// Abrir el pool; falla si la base de datos no responde
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!("🔗 Conectando a MySQL: {}", mask_url(&config.url));
        let pool = config.create_pool().await?;
        info!("✅ MySQL conectado exitosamente");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Pool subyacente
    pub fn connection(&self) -> &MySqlPool {
        &self.pool
    }

    /// Ejecutar las migraciones pendientes
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("🛠️ Aplicando migraciones pendientes...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("✅ Esquema actualizado");
        Ok(())
    }

    /// Verificar que la conexión funciona
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn select<T>(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        bind_params!(sqlx::query_as::<_, T>(sql), params)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn select_one<T>(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        bind_params!(sqlx::query_as::<_, T>(sql), params)
            .fetch_optional(&self.pool)
            .await
    }

    /// `SELECT COUNT(*)` y similares que devuelven un único entero
    pub async fn count(&self, sql: &str, params: &[SqlValue]) -> Result<i64, sqlx::Error> {
        bind_params!(sqlx::query_scalar::<_, i64>(sql), params)
            .fetch_one(&self.pool)
            .await
    }

    /// Devuelve el id autoincremental de la fila insertada
    pub async fn insert(&self, sql: &str, params: &[SqlValue]) -> Result<i64, sqlx::Error> {
        let result = bind_params!(sqlx::query(sql), params)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_id() as i64)
    }

    /// Devuelve el número de filas afectadas
    pub async fn update(&self, sql: &str, params: &[SqlValue]) -> Result<u64, sqlx::Error> {
        let result = bind_params!(sqlx::query(sql), params)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Devuelve el número de filas eliminadas
    pub async fn delete(&self, sql: &str, params: &[SqlValue]) -> Result<u64, sqlx::Error> {
        self.update(sql, params).await
    }

    /// `update` dentro de una transacción ya abierta
    pub async fn update_in(
        tx: &mut Transaction<'static, MySql>,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<u64, sqlx::Error> {
        let result = bind_params!(sqlx::query(sql), params)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn begin(&self) -> Result<Transaction<'static, MySql>, sqlx::Error> {
        self.pool.begin().await
    }
}

/// Construye la cláusula `WHERE` de un listado con filtros opcionales.
///
/// Las condiciones son siempre texto fijo del código; los valores del
/// request viajan únicamente como parámetros.
#[derive(Debug, Default, Clone)]
pub struct WhereClause {
    conditions: Vec<&'static str>,
    params: Vec<SqlValue>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Condición con un único `?`
    pub fn push(&mut self, condition: &'static str, value: impl Into<SqlValue>) -> &mut Self {
        self.conditions.push(condition);
        self.params.push(value.into());
        self
    }

    /// Condición sin parámetros
    pub fn push_raw(&mut self, condition: &'static str) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    /// Condición con un parámetro `%termino%` repetido por cada `?`
    pub fn push_search(&mut self, condition: &'static str, term: &str) -> &mut Self {
        let placeholders = condition.matches('?').count();
        let pattern = format!("%{}%", escape_like(term.trim()));
        self.conditions.push(condition);
        for _ in 0..placeholders {
            self.params.push(SqlValue::Text(pattern.clone()));
        }
        self
    }

    pub fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Parámetros del filtro seguidos de `LIMIT ? OFFSET ?`
    pub fn params_with_page(&self, limit: i64, offset: i64) -> Vec<SqlValue> {
        let mut params = self.params.clone();
        params.push(SqlValue::Int(limit));
        params.push(SqlValue::Int(offset));
        params
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_where_clause() {
        let clause = WhereClause::new();
        assert_eq!(clause.sql(), "");
        assert!(clause.params().is_empty());
    }

    #[test]
    fn test_where_clause_joins_conditions() {
        let mut clause = WhereClause::new();
        clause
            .push("estado = ?", "publicado")
            .push_raw("activo = 1")
            .push_search("(titulo LIKE ? OR contenido LIKE ?)", "50%_off");

        assert_eq!(
            clause.sql(),
            " WHERE estado = ? AND activo = 1 AND (titulo LIKE ? OR contenido LIKE ?)"
        );
        assert_eq!(
            clause.params(),
            &[
                SqlValue::Text("publicado".to_string()),
                SqlValue::Text("%50\\%\\_off%".to_string()),
                SqlValue::Text("%50\\%\\_off%".to_string()),
            ]
        );
    }

    #[test]
    fn test_params_with_page_appends_limit_and_offset() {
        let mut clause = WhereClause::new();
        clause.push("rol = ?", "admin");
        let params = clause.params_with_page(20, 40);
        assert_eq!(params.len(), 3);
        assert_eq!(params[1], SqlValue::Int(20));
        assert_eq!(params[2], SqlValue::Int(40));
    }

    #[test]
    fn test_option_into_sql_value() {
        let none: Option<String> = None;
        assert_eq!(SqlValue::from(none), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(5_i64)), SqlValue::Int(5));
    }
}
