//! Hash de contraseñas con bcrypt
//!
//! bcrypt es costoso en CPU, así que se ejecuta en el pool bloqueante de tokio.

use bcrypt::{hash, verify};

use crate::utils::errors::AppError;

#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Tarea de hash abortada: {}", e)))?
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))
    }

    /// `false` también cuando el hash guardado no es un bcrypt válido
    pub async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        let valid = tokio::task::spawn_blocking(move || verify(password, &password_hash))
            .await
            .map_err(|e| AppError::Internal(format!("Tarea de verificación abortada: {}", e)))?
            .unwrap_or(false);
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let service = PasswordService::new(4);
        let hashed = service.hash("secreto123").await.unwrap();

        assert_ne!(hashed, "secreto123");
        assert!(service.verify("secreto123", &hashed).await.unwrap());
        assert!(!service.verify("otra-clave", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_does_not_verify() {
        let service = PasswordService::new(4);
        assert!(!service.verify("secreto123", "no-es-bcrypt").await.unwrap());
    }
}
