use crate::service::draft::SnippetDraft;
use crate::service::error::ServiceError;

const SEED_SNIPPETS: &str = include_str!("../../seeds/snippets.json");

/// The bundled demo catalog, in insertion order.
pub(crate) fn seed_drafts() -> Result<Vec<SnippetDraft>, ServiceError> {
    serde_json::from_str(SEED_SNIPPETS)
        .map_err(|error| ServiceError::internal(format!("invalid bundled seed data: {error}")))
}
