//! Services module
//!
//! Servicios sin acceso a base de datos: firma de tokens, hash de
//! contraseñas y almacenamiento de archivos subidos.

pub mod jwt_service;
pub mod password_service;
pub mod storage_service;

pub use jwt_service::{JwtConfig, JwtService, SujetoToken, TokenEmitido};
pub use password_service::PasswordService;
pub use storage_service::{
    ArchivoApartado, ArchivoGuardado, CategoriaArchivo, StorageError, StorageService,
};
