//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! usadas por los DTOs (`#[validate(custom = ...)]`) y los controladores.

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    static ref TELEFONO_RE: Regex = Regex::new(r"^\+?[0-9 ()\-]{7,20}$").unwrap();
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a fecha y hora (`YYYY-MM-DDTHH:MM[:SS]`)
pub fn validate_datetime(value: &str) -> Result<NaiveDateTime, ValidationError> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"YYYY-MM-DDTHH:MM:SS".to_string());
            error
        })
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (dígitos, espacios, guiones, paréntesis y `+` inicial)
pub fn validate_telefono(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !TELEFONO_RE.is_match(value.trim()) || !(7..=15).contains(&digits) {
        let mut error = ValidationError::new("telefono");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar URL http(s) o ruta pública servida por el propio backend
pub fn validate_url_o_ruta(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") || value.starts_with('/') {
        if !value.contains(char::is_whitespace) {
            return Ok(());
        }
    }
    let mut error = ValidationError::new("url");
    error.add_param("value".into(), &value.to_string());
    Err(error)
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Normalizar un email para comparaciones y unicidad
pub fn normalizar_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Deserializa fechas con o sin segundos (`datetime-local` de los formularios)
pub mod fecha_flexible {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::validate_datetime(&raw)
            .map_err(|_| de::Error::custom(format!("fecha inválida '{}'", raw)))
    }

    pub mod opcional {
        use chrono::NaiveDateTime;
        use serde::{de, Deserialize, Deserializer};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => super::super::validate_datetime(&raw)
                    .map(Some)
                    .map_err(|_| de::Error::custom(format!("fecha inválida '{}'", raw))),
                _ => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
    }

    #[test]
    fn test_validate_datetime_accepts_common_formats() {
        assert!(validate_datetime("2024-03-10T18:30:00").is_ok());
        assert!(validate_datetime("2024-03-10 18:30").is_ok());
        assert!(validate_datetime("10/03/2024").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(5, 1, 10).is_ok());
        assert!(validate_range(0, 1, 10).is_err());
        assert!(validate_range(15, 1, 10).is_err());
    }

    #[test]
    fn test_validate_telefono() {
        assert!(validate_telefono("+52 (33) 1234-5678").is_ok());
        assert!(validate_telefono("3312345678").is_ok());
        assert!(validate_telefono("123").is_err());
        assert!(validate_telefono("llámame").is_err());
    }

    #[test]
    fn test_validate_url_o_ruta() {
        assert!(validate_url_o_ruta("https://cluster.mx/promo").is_ok());
        assert!(validate_url_o_ruta("/uploads/banners/a.png").is_ok());
        assert!(validate_url_o_ruta("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0).is_ok());
        assert!(validate_non_negative(-1).is_err());
    }

    #[test]
    fn test_normalizar_email() {
        assert_eq!(normalizar_email("  Ana.Lopez@Cluster.MX "), "ana.lopez@cluster.mx");
    }
}
