//! `common-http-server` provides the Axum server scaffold shared by the
//! catalog binaries.
//!
//! - bootstrap (`Server`, `ServerConfig`, `AppBuilder`, `AppConfig`)
//! - request logging with request ids, CORS and request timeouts
//! - liveness and readiness health checks

pub mod core;

pub use core::{
    ApiResponse, AppBuilder, AppConfig, ConfigError, CorsConfig, HealthResponse, LogFormat,
    LoggingConfig, REQUEST_ID_HEADER, ReadinessProbe, RequestId, Server, ServerConfig,
    health_check, init_logging, readiness_check, structured_logging_middleware,
};
