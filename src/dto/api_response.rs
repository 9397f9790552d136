//! Sobre de respuesta exitosa y paginación compartida por todos los recursos

use chrono::{DateTime, Utc};
use serde::Serialize;

/// `{"ok": true, "data": ..., "message"?: ..., "timestamp": ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data,
            message: None,
            timestamp: Utc::now(),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            data,
            message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    /// Respuesta sin datos (p. ej. tras un borrado)
    pub fn message(message: impl Into<String>) -> Self {
        Self::success_with_message((), message)
    }
}

/// Página solicitada, ya acotada a valores válidos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginacion {
    pub page: u32,
    pub per_page: u32,
}

impl Paginacion {
    pub const DEFAULT_PER_PAGE: u32 = 20;
    pub const MAX_PER_PAGE: u32 = 100;

    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(Self::DEFAULT_PER_PAGE)
                .clamp(1, Self::MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }
}

impl Default for Paginacion {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Resultado paginado
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, total: i64, paginacion: Paginacion) -> Self {
        let total = total.max(0);
        let per_page = paginacion.per_page as i64;
        Self {
            items,
            total,
            page: paginacion.page,
            per_page: paginacion.per_page,
            total_pages: ((total + per_page - 1) / per_page) as u32,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListResponse<U> {
        ListResponse {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginacion_defaults_and_bounds() {
        assert_eq!(Paginacion::new(None, None), Paginacion { page: 1, per_page: 20 });
        assert_eq!(Paginacion::new(Some(0), Some(0)), Paginacion { page: 1, per_page: 1 });
        assert_eq!(Paginacion::new(Some(3), Some(500)).per_page, 100);
        assert_eq!(Paginacion::new(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let list = ListResponse::new(vec![1, 2], 41, Paginacion::new(Some(1), Some(20)));
        assert_eq!(list.total_pages, 3);

        let empty: ListResponse<i32> = ListResponse::new(vec![], 0, Paginacion::default());
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::success(vec!["a"])).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["data"][0], "a");
        assert!(json.get("message").is_none());
        assert!(json["timestamp"].is_string());
    }
}
