//! Application router builder.
//!
//! `AppBuilder` only composes routes. Logging, tracing, CORS and timeout
//! layers are applied later by `Server::start`.

use crate::core::{
    health::{ReadinessFuture, ReadinessProbe, health_check, readiness_check},
    response::ApiResponse,
    server::AppConfig,
};
use axum::{Router, http::StatusCode, routing::get};
use std::{future::Future, sync::Arc};

pub struct AppBuilder {
    router: Router,
    app_config: AppConfig,
    known_endpoints: Vec<String>,
    readiness_probe: Option<ReadinessProbe>,
}

impl AppBuilder {
    pub fn new(app_config: AppConfig) -> Self {
        Self {
            router: Router::new().route("/health", get(health_check)),
            app_config,
            known_endpoints: vec!["/health".to_string(), "/health/detailed".to_string()],
            readiness_probe: None,
        }
    }

    pub fn route(mut self, path: &str, method: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, method);
        self.known_endpoints.push(path.to_string());
        self
    }

    pub fn nest(mut self, path: &str, router: Router) -> Self {
        self.router = self.router.nest(path, router);
        self.known_endpoints.push(format!("{}/*", path));
        self
    }

    /// Backs `/health/detailed` with a dependency check, e.g. a database ping.
    pub fn readiness_probe<F, Fut>(mut self, probe: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        self.readiness_probe = Some(Arc::new(move || -> ReadinessFuture { Box::pin(probe()) }));
        self
    }

    /// Consume the builder and return the finalized router (readiness route
    /// and fallback included), the runtime config and the sorted endpoint list.
    pub(crate) fn into_parts(self) -> (Router, AppConfig, Vec<String>) {
        let mut endpoints = self.known_endpoints;
        endpoints.sort();
        endpoints.dedup();

        let probe = self.readiness_probe;
        let router = self
            .router
            .route(
                "/health/detailed",
                get(move || readiness_check(probe.clone())),
            )
            .fallback(fallback_handler);

        (router, self.app_config, endpoints)
    }
}

async fn fallback_handler() -> ApiResponse<()> {
    ApiResponse::error_with_status("Endpoint not found".to_string(), StatusCode::NOT_FOUND)
}
