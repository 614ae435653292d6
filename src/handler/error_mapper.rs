use crate::service::error::{ServiceError, ServiceErrorKind};
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common_http_server_rs::ApiResponse;
use serde_json::Value;

fn status_code_for(kind: ServiceErrorKind) -> StatusCode {
    match kind {
        ServiceErrorKind::Validation => StatusCode::BAD_REQUEST,
        ServiceErrorKind::NotFound => StatusCode::NOT_FOUND,
        ServiceErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ServiceErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = status_code_for(self.kind());
        if status.is_server_error() {
            tracing::error!(error = %self, "Snippet request failed");
        }
        ApiResponse::<Value>::error_with_status(self.message().to_string(), status).into_response()
    }
}

// Malformed bodies and query strings answer with the same envelope as
// payload validation.
impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::validation(rejection.body_text())
    }
}
