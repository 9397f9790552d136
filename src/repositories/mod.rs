//! Repositorios: todo el SQL de la aplicación vive aquí

pub mod banner_repository;
pub mod boletin_repository;
pub mod diagnostico_repository;
pub mod empresa_repository;
pub mod estadistica_repository;
pub mod evento_repository;
pub mod usuario_repository;

pub use banner_repository::BannerRepository;
pub use boletin_repository::BoletinRepository;
pub use diagnostico_repository::DiagnosticoRepository;
pub use empresa_repository::EmpresaRepository;
pub use estadistica_repository::EstadisticaRepository;
pub use evento_repository::EventoRepository;
pub use usuario_repository::UsuarioRepository;

/// Violación de una restricción UNIQUE
pub(crate) fn es_duplicado(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// `?, ?, ?` para una lista `IN (...)` de `n` elementos
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
