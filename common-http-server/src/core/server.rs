//! Server bootstrap and runtime configuration.
//!
//! The startup flow is single-path:
//! `AppBuilder -> Server::new(...) -> Server::start()`.

use crate::core::{
    app::AppBuilder, cors::CorsConfig, logging::LoggingConfig, logging::init_logging,
    logging::structured_logging_middleware,
};
use axum::{Router, middleware};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

/// Listening address. Validated before binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which middleware layers wrap the router, and how they are configured.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub enable_cors: bool,
    /// `tower-http` `TraceLayer`.
    pub enable_tracing: bool,
    /// Subscriber init plus the request-id logging middleware.
    pub enable_logging: bool,
    /// `None` falls back to `CorsConfig::default()` while CORS is enabled.
    pub cors_config: Option<CorsConfig>,
    pub logging_config: LoggingConfig,
    /// Requests running longer than this are answered with 408.
    pub request_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Binds to `127.0.0.1` unless a host is given.
    pub fn new(port: u16) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port).parse().map_err(|_| {
            ConfigError::InvalidSocketAddress {
                host: self.host.clone(),
                port: self.port,
            }
        })
    }

    /// Rejects port 0, an empty host and hosts that don't form a socket address.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Port 0 would bind a random port; require an explicit one.
        if self.port == 0 {
            return Err(ConfigError::InvalidPort {
                port: self.port,
                min: 1,
                max: u16::MAX,
            });
        }

        if self.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        self.address()?;

        Ok(())
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the CORS policy and turns CORS on.
    pub fn with_cors_config(mut self, config: CorsConfig) -> Self {
        self.cors_config = Some(config);
        self.enable_cors = true;
        self
    }

    pub fn with_tracing(mut self, enable: bool) -> Self {
        self.enable_tracing = enable;
        self
    }

    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    pub fn with_logging_config(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self
    }

    /// Installs the `TimeoutLayer`; zero is rejected by `validate`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// The policy the CORS layer is built from, `None` when CORS is off.
    pub fn get_cors_config(&self) -> Option<CorsConfig> {
        if self.enable_cors {
            Some(self.cors_config.clone().unwrap_or_default())
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(cors_config) = &self.cors_config {
            cors_config
                .validate()
                .map_err(|e| ConfigError::InvalidCors(e.to_string()))?;
        }

        if self.request_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(ConfigError::ZeroRequestTimeout);
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_tracing: true,
            enable_logging: true,
            cors_config: None,
            logging_config: LoggingConfig::default(),
            request_timeout: None,
        }
    }
}

/// Startup configuration errors, from env parsing or `validate`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port {port}: must be between {min} and {max}")]
    InvalidPort { port: u16, min: u16, max: u16 },
    #[error("Empty host address")]
    EmptyHost,
    #[error("Invalid CORS configuration: {0}")]
    InvalidCors(String),
    #[error("Invalid socket address: {host}:{port}")]
    InvalidSocketAddress { host: String, port: u16 },
    #[error("Empty allowed origins")]
    EmptyAllowedOrigins,
    #[error("Empty allowed methods")]
    EmptyAllowedMethods,
    #[error("Empty allowed headers")]
    EmptyAllowedHeaders,
    #[error("Request timeout must be greater than zero")]
    ZeroRequestTimeout,
    #[error("Invalid value for environment variable {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Owns the address and the assembled app until `start` consumes both.
pub struct Server {
    server_config: ServerConfig,
    app_builder: AppBuilder,
}

impl Server {
    pub fn new(server_config: ServerConfig, app_builder: AppBuilder) -> Self {
        Self {
            server_config,
            app_builder,
        }
    }

    /// Initializes logging, validates both configs, applies the layers, binds
    /// and serves until Ctrl+C or SIGTERM.
    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let (app, app_config, endpoints) = self.app_builder.into_parts();

        if app_config.enable_logging {
            init_logging(&app_config.logging_config)?;
        }

        self.server_config
            .validate()
            .map_err(|e| format!("Invalid server configuration: {}", e))?;

        app_config
            .validate()
            .map_err(|e| format!("Invalid app configuration: {}", e))?;

        let app = apply_app_layers(app, &app_config);

        let addr = self
            .server_config
            .address()
            .map_err(|e| format!("Invalid server configuration: {}", e))?;

        info!(
            host = %self.server_config.host,
            port = %self.server_config.port,
            cors_enabled = app_config.enable_cors,
            request_timeout_ms = app_config.request_timeout.map(|timeout| timeout.as_millis() as u64),
            endpoints = ?endpoints,
            "Server starting on http://{}",
            addr
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        info!("Server stopped");
        Ok(())
    }
}

/// Request logging is outermost so timed-out requests are still logged.
pub(crate) fn apply_app_layers(mut router: Router, config: &AppConfig) -> Router {
    if let Some(timeout) = config.request_timeout {
        router = router.layer(TimeoutLayer::new(timeout));
    }

    if let Some(cors_config) = config.get_cors_config() {
        router = router.layer(cors_config.build_layer());
    }

    if config.enable_tracing {
        router = router.layer(tower_http::trace::TraceLayer::new_for_http());
    }

    if config.enable_logging {
        router = router.layer(middleware::from_fn(structured_logging_middleware));
    }

    router
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM signal handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "Ctrl+C",
        _ = terminate => "SIGTERM",
    };

    info!(
        signal,
        "Shutdown signal received, starting graceful shutdown"
    );
}
