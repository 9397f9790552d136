//! Lectura del campo `archivo` de un formulario multipart
//!
//! La extensión se valida con la cabecera del campo y el tamaño mientras se
//! leen los fragmentos, de modo que nada llega a disco si no es válido.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use tracing::{debug, error};

use crate::services::storage_service::StorageError;
use crate::services::{ArchivoGuardado, CategoriaArchivo, StorageService};
use crate::utils::errors::{AppError, AppResult};

pub const CAMPO_ARCHIVO: &str = "archivo";

pub async fn recibir_archivo(
    mut multipart: Multipart,
    storage: &StorageService,
    categoria: CategoriaArchivo,
) -> AppResult<ArchivoGuardado> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| error_multipart("Formulario multipart inválido", e))?
    {
        if field.name() != Some(CAMPO_ARCHIVO) {
            continue;
        }

        let nombre_original = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("El campo 'archivo' no trae nombre de archivo".to_string()))?;
        storage.validar_extension(categoria, &nombre_original)?;

        let mut datos = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| error_multipart("Error leyendo el archivo", e))?
        {
            if datos.len() + chunk.len() > storage.max_bytes() {
                return Err(StorageError::ArchivoDemasiadoGrande {
                    tamano: datos.len() + chunk.len(),
                    max: storage.max_bytes(),
                }
                .into());
            }
            datos.extend_from_slice(&chunk);
        }

        debug!("📎 Recibido '{}' ({} bytes)", nombre_original, datos.len());
        return Ok(storage.guardar(categoria, &nombre_original, &datos).await?);
    }

    Err(AppError::BadRequest(
        "Falta el campo 'archivo' en el formulario".to_string(),
    ))
}

/// El límite del cuerpo se traduce a 413; el resto de fallos a 400
fn error_multipart(contexto: &str, error: MultipartError) -> AppError {
    let mensaje = format!("{}: {}", contexto, error.body_text());
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(mensaje)
    } else {
        AppError::BadRequest(mensaje)
    }
}

/// Devuelve `resultado` tal cual; si es un error, el archivo recién guardado
/// se borra para que no quede huérfano en disco
pub async fn descartar_si_falla<T>(
    storage: &StorageService,
    categoria: CategoriaArchivo,
    archivo: &ArchivoGuardado,
    resultado: AppResult<T>,
) -> AppResult<T> {
    if resultado.is_err() {
        if let Err(e) = storage.eliminar(categoria, &archivo.nombre).await {
            error!(
                "❌ Archivo huérfano {}/{}: {}",
                categoria.subdir(),
                archivo.nombre,
                e
            );
        }
    }
    resultado
}
