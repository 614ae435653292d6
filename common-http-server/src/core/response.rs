use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

/// Error envelope shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Always `None` on errors; successful handlers return their own JSON.
    pub data: Option<T>,
    pub error: Option<String>,
    pub request_id: Option<String>,
    /// Mirrors the HTTP status so clients can read it from the body.
    pub status_code: Option<u16>,
}

impl<T> ApiResponse<T> {
    /// A failed response carrying `status`, which `into_response` answers
    /// with.
    pub fn error_with_status(error: String, status: StatusCode) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            request_id: None,
            status_code: Some(status.as_u16()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let default_status = if self.success {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let status = self
            .status_code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(default_status);

        (status, Json(self)).into_response()
    }
}

/// Body of `/health` and `/health/detailed`; `status` is `ok` or `error`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthResponse {
    /// Answered with 200.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Service is running".to_string(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Answered with 503; `message` says which dependency failed.
    pub fn unhealthy(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> axum::response::Response {
        let status = if self.status == "ok" {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_is_used_for_the_response() {
        let response =
            ApiResponse::<()>::error_with_status("missing".to_string(), StatusCode::NOT_FOUND)
                .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unhealthy_maps_to_service_unavailable() {
        let response = HealthResponse::unhealthy("down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
