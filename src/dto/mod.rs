//! DTOs de entrada y salida de la API

pub mod api_response;
pub mod auth_dto;
pub mod banner_dto;
pub mod boletin_dto;
pub mod diagnostico_dto;
pub mod empresa_dto;
pub mod estadistica_dto;
pub mod evento_dto;
pub mod usuario_dto;

pub use api_response::{ApiResponse, ListResponse, Paginacion};
