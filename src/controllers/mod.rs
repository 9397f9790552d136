//! Controladores: reglas de negocio entre las rutas y los repositorios

pub mod auth_controller;
pub mod banner_controller;
pub mod boletin_controller;
pub mod diagnostico_controller;
pub mod empresa_controller;
pub mod estadistica_controller;
pub mod evento_controller;
pub mod upload;
pub mod usuario_controller;
