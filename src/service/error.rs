use sea_orm::DbErr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ServiceErrorKind {
    Validation,
    NotFound,
    StoreUnavailable,
    Internal,
}

#[derive(Debug, Clone)]
pub(crate) struct ServiceError {
    kind: ServiceErrorKind,
    message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Validation, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::NotFound, message)
    }

    pub(crate) fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::StoreUnavailable, message)
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Internal, message)
    }

    pub(crate) fn kind(&self) -> ServiceErrorKind {
        self.kind
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

pub(crate) fn map_db_error(error: DbErr) -> ServiceError {
    match error {
        DbErr::RecordNotFound(message) => ServiceError::not_found(message),
        DbErr::RecordNotUpdated => ServiceError::not_found("snippet no longer exists"),
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            ServiceError::store_unavailable(format!("snippet store is unavailable: {error}"))
        }
        other => ServiceError::internal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnAcquireErr, RuntimeErr};

    #[test]
    fn connection_failures_map_to_store_unavailable() {
        let error = map_db_error(DbErr::Conn(RuntimeErr::Internal("refused".to_string())));
        assert_eq!(error.kind(), ServiceErrorKind::StoreUnavailable);

        let error = map_db_error(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout));
        assert_eq!(error.kind(), ServiceErrorKind::StoreUnavailable);
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        assert_eq!(
            map_db_error(DbErr::RecordNotUpdated).kind(),
            ServiceErrorKind::NotFound
        );
        assert_eq!(
            map_db_error(DbErr::RecordNotFound("gone".to_string())).kind(),
            ServiceErrorKind::NotFound
        );
    }

    #[test]
    fn other_store_errors_are_internal() {
        let error = map_db_error(DbErr::Custom("boom".to_string()));
        assert_eq!(error.kind(), ServiceErrorKind::Internal);
        assert!(error.message().contains("boom"));
    }
}
