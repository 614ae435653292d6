use crate::service::error::ServiceError;
use crate::service::snippet_service::SnippetService;
use axum::{Json, Router, routing::post};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct SeedResponse {
    success: bool,
    count: usize,
}

pub(crate) fn router(service: SnippetService) -> Router {
    Router::new().route("/seed", post(move || seed_catalog(service.clone())))
}

async fn seed_catalog(service: SnippetService) -> Result<Json<SeedResponse>, ServiceError> {
    let count = service.seed().await?;
    Ok(Json(SeedResponse {
        success: true,
        count,
    }))
}
