mod error_mapper;
pub(crate) mod health_handler;
mod seed_handler;
mod snippet_handler;

use crate::service::snippet_service::SnippetService;
use axum::Router;

pub(crate) fn api_router(service: SnippetService, seed_route_enabled: bool) -> Router {
    let router = Router::new().merge(snippet_handler::router(service.clone()));

    if seed_route_enabled {
        router.merge(seed_handler::router(service))
    } else {
        router
    }
}
