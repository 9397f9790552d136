//! Backend de la intranet del clúster empresarial
//!
//! API REST sobre MySQL: usuarios y autenticación JWT, empresas en convenio,
//! eventos con inscripciones, boletines, banners y estadísticas del portal.

pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::build_router;
pub use state::AppState;
