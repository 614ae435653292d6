use crate::service::error::ServiceError;
use crate::service::filter::SnippetFilter;
use crate::service::snippet_service::SnippetService;
use axum::{
    Json, Router,
    extract::{
        Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;

pub(crate) fn router(service: SnippetService) -> Router {
    let list_service = service.clone();
    let create_service = service.clone();
    let get_service = service.clone();
    let update_service = service.clone();
    let delete_service = service;

    Router::new()
        .route(
            "/snippets",
            get(move |query: Result<Query<SnippetFilter>, QueryRejection>| {
                list_snippets(list_service.clone(), query)
            })
            .post(move |payload: Result<Json<Value>, JsonRejection>| {
                create_snippet(create_service.clone(), payload)
            }),
        )
        .route(
            "/snippets/{id}",
            get(move |Path(id): Path<String>| get_snippet(get_service.clone(), id))
                .put(move |Path(id): Path<String>, payload: Result<Json<Value>, JsonRejection>| {
                    update_snippet(update_service.clone(), id, payload)
                })
                .delete(move |Path(id): Path<String>| delete_snippet(delete_service.clone(), id)),
        )
}

async fn list_snippets(
    service: SnippetService,
    query: Result<Query<SnippetFilter>, QueryRejection>,
) -> Result<Response, ServiceError> {
    let Query(filter) = query?;
    let snippets = service.list(filter).await?;
    Ok((StatusCode::OK, Json(snippets)).into_response())
}

async fn create_snippet(
    service: SnippetService,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(payload) = payload?;
    let created = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

async fn get_snippet(service: SnippetService, id: String) -> Result<Response, ServiceError> {
    let snippet = service.get(&id).await?;
    Ok((StatusCode::OK, Json(snippet)).into_response())
}

async fn update_snippet(
    service: SnippetService,
    id: String,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(payload) = payload?;
    let updated = service.update(&id, payload).await?;
    Ok((StatusCode::OK, Json(updated)).into_response())
}

async fn delete_snippet(service: SnippetService, id: String) -> Result<Response, ServiceError> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
