//! Módulo de base de datos
//!
//! Maneja la conexión y operaciones con MySQL

pub mod connection;

pub use connection::{DatabaseConnection, SqlValue, WhereClause};
