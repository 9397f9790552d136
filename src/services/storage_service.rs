//! Almacenamiento de archivos subidos
//!
//! Los archivos se guardan en `<upload_dir>/<categoria>/` con un nombre
//! generado por el servidor y se publican bajo `/uploads/<categoria>/`.
//! Extensión y tamaño se validan antes de escribir nada en disco.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Prefijo público con el que se sirven los archivos
pub const PUBLIC_PREFIX: &str = "/uploads";

const IMAGENES: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const DOCUMENTOS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "jpg", "jpeg", "png",
];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("El archivo pesa {tamano} bytes; el máximo permitido es {max} bytes")]
    ArchivoDemasiadoGrande { tamano: usize, max: usize },

    #[error("Extensión '.{extension}' no permitida (permitidas: {permitidas})")]
    ExtensionNoPermitida {
        extension: String,
        permitidas: String,
    },

    #[error("El archivo no tiene extensión")]
    SinExtension,

    #[error("El archivo está vacío")]
    ArchivoVacio,

    #[error("Nombre de archivo inválido: {0}")]
    NombreInvalido(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),
}

/// Carpeta de destino de un archivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoriaArchivo {
    Boletines,
    Banners,
    Empresas,
}

impl CategoriaArchivo {
    pub const ALL: [CategoriaArchivo; 3] = [
        CategoriaArchivo::Boletines,
        CategoriaArchivo::Banners,
        CategoriaArchivo::Empresas,
    ];

    pub fn subdir(&self) -> &'static str {
        match self {
            CategoriaArchivo::Boletines => "boletines",
            CategoriaArchivo::Banners => "banners",
            CategoriaArchivo::Empresas => "empresas",
        }
    }

    pub fn extensiones(&self) -> &'static [&'static str] {
        match self {
            CategoriaArchivo::Boletines => DOCUMENTOS,
            CategoriaArchivo::Banners | CategoriaArchivo::Empresas => IMAGENES,
        }
    }
}

/// Resultado de guardar un archivo
#[derive(Debug, Clone)]
pub struct ArchivoGuardado {
    /// Nombre generado en el servidor
    pub nombre: String,
    /// Nombre original enviado por el cliente
    pub nombre_original: String,
    /// Ruta pública (`/uploads/<categoria>/<nombre>`)
    pub url: String,
    pub tamano: usize,
}

const SUFIJO_APARTADO: &str = ".eliminando";

/// Archivo renombrado a la espera de confirmar o deshacer su borrado
#[derive(Debug)]
pub struct ArchivoApartado {
    original: PathBuf,
    apartado: PathBuf,
}

impl ArchivoApartado {
    /// Borra el archivo definitivamente
    pub async fn confirmar(self) -> Result<(), StorageError> {
        tokio::fs::remove_file(&self.apartado).await?;
        info!("🗑️ Archivo eliminado: {}", self.original.display());
        Ok(())
    }

    /// Devuelve el archivo a su nombre original
    pub async fn restaurar(self) -> Result<(), StorageError> {
        tokio::fs::rename(&self.apartado, &self.original).await?;
        info!("↩️ Archivo restaurado: {}", self.original.display());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StorageService {
    base_dir: PathBuf,
    max_bytes: usize,
}

impl StorageService {
    pub fn new(base_dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            base_dir: base_dir.into(),
            max_bytes,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Extensión en minúsculas si está permitida para la categoría
    pub fn validar_extension(
        &self,
        categoria: CategoriaArchivo,
        nombre_original: &str,
    ) -> Result<String, StorageError> {
        let nombre = Path::new(nombre_original)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::NombreInvalido(nombre_original.to_string()))?;

        let extension = Path::new(nombre)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or(StorageError::SinExtension)?;

        let permitidas = categoria.extensiones();
        if !permitidas.contains(&extension.as_str()) {
            return Err(StorageError::ExtensionNoPermitida {
                extension,
                permitidas: permitidas.join(", "),
            });
        }

        Ok(extension)
    }

    pub fn validar_tamano(&self, tamano: usize) -> Result<(), StorageError> {
        if tamano == 0 {
            return Err(StorageError::ArchivoVacio);
        }
        if tamano > self.max_bytes {
            return Err(StorageError::ArchivoDemasiadoGrande {
                tamano,
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    /// `<unix_ts>_<uuid>.<ext>`
    pub fn generar_nombre(extension: &str) -> String {
        format!(
            "{}_{}.{}",
            Utc::now().timestamp(),
            Uuid::new_v4().simple(),
            extension
        )
    }

    /// Valida y guarda el archivo; no escribe nada si la validación falla
    pub async fn guardar(
        &self,
        categoria: CategoriaArchivo,
        nombre_original: &str,
        contenido: &[u8],
    ) -> Result<ArchivoGuardado, StorageError> {
        let extension = self.validar_extension(categoria, nombre_original)?;
        self.validar_tamano(contenido.len())?;

        let dir = self.base_dir.join(categoria.subdir());
        tokio::fs::create_dir_all(&dir).await?;

        let nombre = Self::generar_nombre(&extension);
        tokio::fs::write(dir.join(&nombre), contenido).await?;

        info!(
            "📁 Archivo guardado: {}/{} ({} bytes)",
            categoria.subdir(),
            nombre,
            contenido.len()
        );

        Ok(ArchivoGuardado {
            url: Self::ruta_publica(categoria, &nombre),
            nombre,
            nombre_original: nombre_original.to_string(),
            tamano: contenido.len(),
        })
    }

    /// Elimina un archivo. `Ok(false)` si ya no existía.
    pub async fn eliminar(
        &self,
        categoria: CategoriaArchivo,
        nombre: &str,
    ) -> Result<bool, StorageError> {
        let ruta = self.ruta(categoria, nombre)?;
        match tokio::fs::remove_file(&ruta).await {
            Ok(()) => {
                info!("🗑️ Archivo eliminado: {}/{}", categoria.subdir(), nombre);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Archivo {}/{} ya no existía", categoria.subdir(), nombre);
                Ok(false)
            }
            Err(e) => {
                warn!("⚠️ No se pudo eliminar {}: {}", ruta.display(), e);
                Err(StorageError::Io(e))
            }
        }
    }

    /// Primer paso de un borrado que depende de una transacción: el archivo
    /// deja de publicarse pero puede volver con [`ArchivoApartado::restaurar`].
    /// `Ok(None)` si ya no existía.
    pub async fn apartar(
        &self,
        categoria: CategoriaArchivo,
        nombre: &str,
    ) -> Result<Option<ArchivoApartado>, StorageError> {
        let original = self.ruta(categoria, nombre)?;
        let apartado = original.with_file_name(format!("{}{}", nombre, SUFIJO_APARTADO));
        match tokio::fs::rename(&original, &apartado).await {
            Ok(()) => {
                debug!("Archivo {}/{} apartado", categoria.subdir(), nombre);
                Ok(Some(ArchivoApartado { original, apartado }))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Archivo {}/{} ya no existía", categoria.subdir(), nombre);
                Ok(None)
            }
            Err(e) => {
                warn!("⚠️ No se pudo apartar {}: {}", original.display(), e);
                Err(StorageError::Io(e))
            }
        }
    }

    /// Ruta en disco; rechaza nombres con separadores o `..`
    pub fn ruta(&self, categoria: CategoriaArchivo, nombre: &str) -> Result<PathBuf, StorageError> {
        let valido = !nombre.is_empty()
            && !nombre.contains(['/', '\\'])
            && nombre != "."
            && nombre != "..";
        if !valido {
            return Err(StorageError::NombreInvalido(nombre.to_string()));
        }
        Ok(self.base_dir.join(categoria.subdir()).join(nombre))
    }

    pub fn ruta_publica(categoria: CategoriaArchivo, nombre: &str) -> String {
        format!("{}/{}/{}", PUBLIC_PREFIX, categoria.subdir(), nombre)
    }

    /// Nombre local de un archivo a partir de su URL pública, si es nuestro
    pub fn nombre_local<'a>(&self, categoria: CategoriaArchivo, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(PUBLIC_PREFIX)?
            .strip_prefix('/')?
            .strip_prefix(categoria.subdir())?
            .strip_prefix('/')
            .filter(|nombre| !nombre.is_empty() && !nombre.contains('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &Path) -> StorageService {
        StorageService::new(dir, 1024)
    }

    fn archivos_en(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|it| it.count()).unwrap_or(0)
    }

    #[test]
    fn test_extension_allow_list_per_category() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = storage(tmp.path());

        assert_eq!(
            storage
                .validar_extension(CategoriaArchivo::Boletines, "Informe.PDF")
                .unwrap(),
            "pdf"
        );
        assert!(storage
            .validar_extension(CategoriaArchivo::Banners, "informe.pdf")
            .is_err());
        assert!(matches!(
            storage.validar_extension(CategoriaArchivo::Banners, "sin_extension"),
            Err(StorageError::SinExtension)
        ));
    }

    #[tokio::test]
    async fn test_rejected_extension_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = storage(tmp.path());

        let result = storage
            .guardar(CategoriaArchivo::Boletines, "virus.exe", b"MZ")
            .await;

        assert!(matches!(
            result,
            Err(StorageError::ExtensionNoPermitida { .. })
        ));
        assert_eq!(archivos_en(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_oversized_file_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = storage(tmp.path());
        let contenido = vec![0u8; 1025];

        let result = storage
            .guardar(CategoriaArchivo::Banners, "foto.png", &contenido)
            .await;

        assert!(matches!(
            result,
            Err(StorageError::ArchivoDemasiadoGrande { tamano: 1025, max: 1024 })
        ));
        assert_eq!(archivos_en(tmp.path()), 0);
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = storage(tmp.path());

        let guardado = storage
            .guardar(CategoriaArchivo::Empresas, "logo.png", b"png")
            .await
            .unwrap();

        assert!(guardado.nombre.ends_with(".png"));
        assert_ne!(guardado.nombre, "logo.png");
        assert_eq!(guardado.url, format!("/uploads/empresas/{}", guardado.nombre));
        assert!(tmp.path().join("empresas").join(&guardado.nombre).exists());

        assert!(storage
            .eliminar(CategoriaArchivo::Empresas, &guardado.nombre)
            .await
            .unwrap());
        assert!(!storage
            .eliminar(CategoriaArchivo::Empresas, &guardado.nombre)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_set_aside_then_restore() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = storage(tmp.path());
        let guardado = storage
            .guardar(CategoriaArchivo::Boletines, "acta.pdf", b"%PDF")
            .await
            .unwrap();
        let ruta = tmp.path().join("boletines").join(&guardado.nombre);

        let apartado = storage
            .apartar(CategoriaArchivo::Boletines, &guardado.nombre)
            .await
            .unwrap()
            .unwrap();
        assert!(!ruta.exists());

        apartado.restaurar().await.unwrap();
        assert!(ruta.exists());
        assert_eq!(archivos_en(&tmp.path().join("boletines")), 1);
    }

    #[tokio::test]
    async fn test_set_aside_then_confirm() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = storage(tmp.path());
        let guardado = storage
            .guardar(CategoriaArchivo::Boletines, "acta.pdf", b"%PDF")
            .await
            .unwrap();

        storage
            .apartar(CategoriaArchivo::Boletines, &guardado.nombre)
            .await
            .unwrap()
            .unwrap()
            .confirmar()
            .await
            .unwrap();

        assert_eq!(archivos_en(&tmp.path().join("boletines")), 0);
        assert!(storage
            .apartar(CategoriaArchivo::Boletines, &guardado.nombre)
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_path_traversal_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = storage(tmp.path());

        assert!(storage.ruta(CategoriaArchivo::Boletines, "../secreto").is_err());
        assert!(storage.ruta(CategoriaArchivo::Boletines, "..").is_err());
        assert!(storage.ruta(CategoriaArchivo::Boletines, "a.pdf").is_ok());
    }

    #[test]
    fn test_nombre_local_only_for_own_urls() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = storage(tmp.path());

        assert_eq!(
            storage.nombre_local(CategoriaArchivo::Banners, "/uploads/banners/1_ab.png"),
            Some("1_ab.png")
        );
        assert_eq!(
            storage.nombre_local(CategoriaArchivo::Banners, "https://cdn.mx/1_ab.png"),
            None
        );
        assert_eq!(
            storage.nombre_local(CategoriaArchivo::Banners, "/uploads/empresas/1_ab.png"),
            None
        );
    }

    #[test]
    fn test_generated_names_are_unique() {
        let a = StorageService::generar_nombre("pdf");
        let b = StorageService::generar_nombre("pdf");
        assert_ne!(a, b);
        assert!(a.ends_with(".pdf"));
    }
}
