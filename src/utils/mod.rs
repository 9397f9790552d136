//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT, extractores y otras funcionalidades comunes.

pub mod errors;
pub mod extract;
pub mod jwt;
pub mod validation;
