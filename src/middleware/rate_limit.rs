//! Middleware de Rate Limiting
//!
//! Ventana fija por IP de cliente, en memoria del proceso. Se aplica a las
//! rutas de autenticación para frenar ataques de fuerza bruta.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use tokio::sync::RwLock;
use tracing::warn;

use crate::config::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Peticiones de una IP en la ventana actual
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
    trust_proxy: bool,
}

impl RateLimitState {
    pub fn new(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
            trust_proxy: false,
        }
    }

    /// Usar `X-Forwarded-For` como IP del cliente
    pub fn behind_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_window),
        )
        .behind_proxy(config.trust_proxy)
    }

    /// Cuenta la petición; error si la IP ya agotó su ventana
    pub async fn check_rate_limit(&self, ip: &str) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= self.max_requests {
            warn!("🚦 Rate limit excedido para {}", ip);
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

/// IP del cliente: la dirección del socket, o el primer valor de
/// `X-Forwarded-For` solo si el servidor está detrás de un proxy de confianza
fn client_ip(request: &Request, trust_proxy: bool) -> String {
    let forwarded = trust_proxy
        .then(|| {
            request
                .headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.split(',').next())
                .map(|ip| ip.trim().to_string())
                .filter(|ip| !ip.is_empty())
        })
        .flatten();

    forwarded
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(rate_limit_state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request, rate_limit_state.trust_proxy);
    rate_limit_state.check_rate_limit(&ip).await?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_is_per_ip() {
        let state = RateLimitState::new(2, Duration::from_secs(60));

        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(matches!(
            state.check_rate_limit("10.0.0.1").await,
            Err(AppError::RateLimitExceeded)
        ));
        assert!(state.check_rate_limit("10.0.0.2").await.is_ok());
    }

    #[tokio::test]
    async fn test_window_resets() {
        let state = RateLimitState::new(1, Duration::from_millis(20));

        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_err());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
    }

    fn request_from(addr: &str, forwarded: Option<&str>) -> Request {
        let mut builder = Request::builder();
        if let Some(forwarded) = forwarded {
            builder = builder.header("x-forwarded-for", forwarded);
        }
        let mut request = builder.body(axum::body::Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(addr.parse::<SocketAddr>().unwrap()));
        request
    }

    #[test]
    fn test_client_ip_ignores_forwarded_header_by_default() {
        let request = request_from("192.0.2.10:51000", Some("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&request, false), "192.0.2.10");

        let sin_socket = Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(client_ip(&sin_socket, false), "unknown");
    }

    #[test]
    fn test_client_ip_uses_forwarded_header_behind_proxy() {
        let request = request_from("10.0.0.1:443", Some("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&request, true), "203.0.113.7");

        let sin_header = request_from("10.0.0.1:443", None);
        assert_eq!(client_ip(&sin_header, true), "10.0.0.1");
    }
}
