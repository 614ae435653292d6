//! CORS configuration.

use crate::core::server::ConfigError;
use axum::http::{HeaderName, HeaderValue, Method};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed when `allow_any_origin` is off.
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age: Option<u64>,
    /// Answer every origin, the way a browser-facing dev API usually runs.
    pub allow_any_origin: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .map(str::to_string)
                .to_vec(),
            allowed_headers: ["Content-Type", "X-Request-ID"]
                .map(str::to_string)
                .to_vec(),
            max_age: Some(86400),
            allow_any_origin: true,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_env<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: raw.to_string(),
    })
}

impl CorsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts CORS to the given origins.
    pub fn allowed_origins(mut self, origins: Vec<&str>) -> Self {
        self.allowed_origins = origins.into_iter().map(str::to_string).collect();
        self.allow_any_origin = false;
        self
    }

    pub fn max_age(mut self, max_age: u64) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn build_layer(&self) -> CorsLayer {
        let mut cors = CorsLayer::new();

        if self.allow_any_origin {
            tracing::debug!("CORS allows any origin");
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect();
            cors = cors.allow_origin(origins);
        }

        let methods: Vec<Method> = self
            .allowed_methods
            .iter()
            .filter_map(|method| method.parse().ok())
            .collect();
        let headers: Vec<HeaderName> = self
            .allowed_headers
            .iter()
            .filter_map(|header| HeaderName::from_str(header).ok())
            .collect();
        cors = cors.allow_methods(methods).allow_headers(headers);

        if let Some(max_age) = self.max_age {
            cors = cors.max_age(Duration::from_secs(max_age));
        }

        cors
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_origins.is_empty() && !self.allow_any_origin {
            return Err(ConfigError::EmptyAllowedOrigins);
        }
        if self.allowed_methods.is_empty() {
            return Err(ConfigError::EmptyAllowedMethods);
        }
        if self.allowed_headers.is_empty() {
            return Err(ConfigError::EmptyAllowedHeaders);
        }
        Ok(())
    }

    /// Reads `CORS_ALLOWED_ORIGINS`, `CORS_ALLOWED_METHODS`,
    /// `CORS_ALLOWED_HEADERS`, `CORS_MAX_AGE` and `CORS_DEV_MODE`. An origin
    /// list of `*` or no list at all keeps every origin allowed, and
    /// `CORS_DEV_MODE=true` allows every origin whatever the list says.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            let origins = split_list(&origins);
            if !origins.is_empty() && !origins.iter().any(|origin| origin == "*") {
                config.allowed_origins = origins;
                config.allow_any_origin = false;
            }
        }
        if let Some(methods) = lookup("CORS_ALLOWED_METHODS") {
            config.allowed_methods = split_list(&methods);
        }
        if let Some(headers) = lookup("CORS_ALLOWED_HEADERS") {
            config.allowed_headers = split_list(&headers);
        }
        if let Some(max_age) = lookup("CORS_MAX_AGE") {
            config.max_age = Some(parse_env("CORS_MAX_AGE", &max_age)?);
        }
        if let Some(dev_mode) = lookup("CORS_DEV_MODE") {
            if parse_env::<bool>("CORS_DEV_MODE", &dev_mode)? {
                config.allow_any_origin = true;
            }
        }

        Ok(config)
    }
}
