//! Middleware del sistema
//!
//! Extractores de autenticación, CORS y rate limiting.

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::{AdminUser, AuthenticatedUser};
pub use cors::cors_layer;
pub use rate_limit::{rate_limit_middleware, RateLimitState};
