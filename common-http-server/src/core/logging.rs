//! Logging initialization and request logging middleware.

use axum::{
    extract::Request as AxumRequest,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;
static JSON_LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Also write JSON lines to this file.
    pub json_file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            json_file_path: None,
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_json_file(mut self, path: Option<String>) -> Self {
        self.json_file_path = path;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn is_valid_request_id(raw: &str) -> bool {
    !raw.is_empty()
        && raw.len() <= MAX_REQUEST_ID_LEN
        && raw
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b':'))
}

fn normalized_request_id(candidate: Option<&str>) -> String {
    if let Some(raw) = candidate {
        let trimmed = raw.trim();
        if is_valid_request_id(trimmed) {
            return trimmed.to_string();
        }
    }

    uuid::Uuid::new_v4().to_string()
}

/// Installs the global subscriber. Filter comes from `RUST_LOG` (default
/// `info`). Calling it again is a no-op.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    if LOGGING_INITIALIZED.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let terminal_layer = tracing_subscriber::fmt::layer().with_target(false);
    let terminal_layer = match config.format {
        LogFormat::Json => terminal_layer.json().boxed(),
        LogFormat::Pretty => terminal_layer.pretty().boxed(),
    };

    let file_layer = match &config.json_file_path {
        Some(path) => {
            let writer = build_json_file_writer(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(writer),
            )
        }
        None => None,
    };

    let init_result = tracing_subscriber::registry()
        .with(env_filter)
        .with(terminal_layer)
        .with(file_layer)
        .try_init();

    // A subscriber installed by a parent binary or test harness wins.
    if init_result.is_ok() {
        info!(format = ?config.format, "Logging system initialized");
    }
    let _ = LOGGING_INITIALIZED.set(());
    Ok(())
}

fn build_json_file_writer(
    path: &str,
) -> Result<tracing_appender::non_blocking::NonBlocking, Box<dyn std::error::Error>> {
    let path = PathBuf::from(path);
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "json log path must contain a file name",
        )
    })?;
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = JSON_LOG_GUARD.set(guard);
    Ok(non_blocking)
}

/// Tags each request with an `x-request-id` (kept from the client when
/// well-formed) and logs start and completion.
pub async fn structured_logging_middleware(request: AxumRequest, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let request_id_header = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok());

    let request_id = normalized_request_id(request_id_header);
    let mut request = request;
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Request started"
    );

    let mut response = next.run(request).await;
    let duration_ms = start_time.elapsed().as_millis();
    let status = response.status();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    match status.as_u16() {
        200..=399 => info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status,
            duration_ms,
            "Request completed"
        ),
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status,
            duration_ms,
            "Client error"
        ),
        _ => error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status,
            duration_ms,
            "Server error"
        ),
    }

    response
}
