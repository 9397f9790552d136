//! Cliente HTTP de la API de la intranet

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

/// Sobre `{"ok": ..., "data" | "error": ...}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    data: Option<T>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    kind: String,
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub nombre_completo: String,
    pub email: String,
    pub rol: String,
    pub estado_usuario: String,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    usuario: Usuario,
}

#[derive(Debug, Deserialize)]
struct RefreshData {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct Lista<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct Boletin {
    pub id: i64,
    pub titulo: String,
    pub resumen: Option<String>,
    pub visualizaciones: i32,
    pub fecha_publicacion: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct Evento {
    pub id: i64,
    pub titulo: String,
    pub fecha_inicio: String,
    pub ubicacion: Option<String>,
    pub estado: String,
    pub plazas_disponibles: Option<i32>,
}

/// Tokens de la sesión actual
#[derive(Debug, Clone)]
pub struct Sesion {
    pub access_token: String,
    pub refresh_token: String,
    pub expira_en: DateTime<Utc>,
    pub usuario: Usuario,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Sesion> {
        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        let data: LoginData = enviar(request).await?;

        Ok(Sesion {
            access_token: data.access_token,
            refresh_token: data.refresh_token,
            expira_en: Utc::now() + Duration::seconds(data.expires_in),
            usuario: data.usuario,
        })
    }

    /// Nuevo access token; el refresh token no cambia
    pub async fn refresh(&self, sesion: &Sesion) -> Result<Sesion> {
        let request = self
            .http
            .post(self.url("/api/auth/refresh-token"))
            .json(&json!({ "refresh_token": sesion.refresh_token }));
        let data: RefreshData = enviar(request).await?;

        Ok(Sesion {
            access_token: data.access_token,
            expira_en: Utc::now() + Duration::seconds(data.expires_in),
            ..sesion.clone()
        })
    }

    pub async fn logout(&self, sesion: &Sesion) -> Result<()> {
        let request = self
            .http
            .post(self.url("/api/auth/logout"))
            .bearer_auth(&sesion.access_token)
            .json(&json!({ "refresh_token": sesion.refresh_token }));
        let response = request.send().await?;
        let status = response.status();
        let texto = response.text().await?;
        comprobar(status, &texto)
    }

    pub async fn me(&self, sesion: &Sesion) -> Result<Usuario> {
        enviar(self.http.get(self.url("/api/auth/me")).bearer_auth(&sesion.access_token)).await
    }

    pub async fn boletines(&self, sesion: &Sesion) -> Result<Lista<Boletin>> {
        let request = self
            .http
            .get(self.url("/api/boletines"))
            .query(&[("per_page", "10")])
            .bearer_auth(&sesion.access_token);
        enviar(request).await
    }

    pub async fn eventos(&self, sesion: &Sesion) -> Result<Lista<Evento>> {
        let request = self
            .http
            .get(self.url("/api/eventos"))
            .query(&[("proximos", "true"), ("per_page", "10")])
            .bearer_auth(&sesion.access_token);
        enviar(request).await
    }
}

async fn enviar<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    let texto = response.text().await?;
    desempaquetar(status, &texto)
}

fn desempaquetar<T: DeserializeOwned>(status: StatusCode, texto: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(texto)
        .map_err(|e| anyhow!("Respuesta inesperada ({}): {}", status, e))?;

    if envelope.ok {
        return envelope
            .data
            .ok_or_else(|| anyhow!("Respuesta sin datos ({})", status));
    }

    match envelope.error {
        Some(error) => Err(anyhow!("{} [{}]: {}", status, error.kind, error.message)),
        None => Err(anyhow!("Error {}", status)),
    }
}

/// Para respuestas sin `data` (p. ej. logout)
fn comprobar(status: StatusCode, texto: &str) -> Result<()> {
    let envelope: Envelope<Value> = serde_json::from_str(texto)
        .map_err(|e| anyhow!("Respuesta inesperada ({}): {}", status, e))?;
    match (envelope.ok, envelope.error) {
        (true, _) => Ok(()),
        (false, Some(error)) => Err(anyhow!("{} [{}]: {}", status, error.kind, error.message)),
        (false, None) => Err(anyhow!("Error {}", status)),
    }
}
