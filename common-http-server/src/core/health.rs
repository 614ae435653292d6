use crate::core::response::HealthResponse;
use std::{future::Future, pin::Pin, sync::Arc};
use tracing::{debug, warn};

pub type ReadinessFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;

/// Checks a backing dependency (usually the database) for `/health/detailed`.
pub type ReadinessProbe = Arc<dyn Fn() -> ReadinessFuture + Send + Sync>;

/// Liveness: the process is up and routing requests.
pub async fn health_check() -> HealthResponse {
    debug!("Health check requested");
    HealthResponse::healthy()
}

/// Readiness: runs the registered probe, 503 when it fails.
pub async fn readiness_check(probe: Option<ReadinessProbe>) -> HealthResponse {
    let Some(probe) = probe else {
        return HealthResponse::healthy();
    };

    match probe().await {
        Ok(()) => HealthResponse::healthy(),
        Err(message) => {
            warn!(error = %message, "Readiness probe failed");
            HealthResponse::unhealthy(message)
        }
    }
}
