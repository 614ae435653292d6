use crate::config::CatalogSettings;
use crate::handler::{api_router, health_handler::ping};
use crate::service::snippet_service::SnippetService;
use axum::routing::get;
use common_http_server_rs::{
    AppBuilder, AppConfig, CorsConfig, LoggingConfig, Server, ServerConfig, init_logging,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::sync::Arc;
use tracing::info;

fn logging_config(settings: &CatalogSettings) -> LoggingConfig {
    LoggingConfig::default()
        .with_format(settings.log_format)
        .with_json_file(settings.log_file.clone())
}

fn build_server(settings: &CatalogSettings, cors: CorsConfig, db: Arc<DatabaseConnection>) -> Server {
    let app_config = AppConfig::new()
        .with_logging(true)
        .with_tracing(true)
        .with_logging_config(logging_config(settings))
        .with_cors_config(cors)
        .with_request_timeout(settings.request_timeout);

    let service = SnippetService::new(db.clone(), settings.rules.clone());

    let app_builder = AppBuilder::new(app_config)
        .route("/ping", get(ping))
        .nest("/api", api_router(service, settings.seed_route_enabled))
        .readiness_probe(move || {
            let db = db.clone();
            async move { db.ping().await.map_err(|error| error.to_string()) }
        });

    let server_config = ServerConfig::new(settings.port).with_host(settings.host.clone());

    Server::new(server_config, app_builder)
}

async fn connect_store(settings: &CatalogSettings) -> Result<DatabaseConnection, sea_orm::DbErr> {
    let mut options = ConnectOptions::new(settings.database_url.clone());
    options
        .connect_timeout(settings.db_connect_timeout)
        .acquire_timeout(settings.db_connect_timeout)
        .sqlx_logging(false);

    Database::connect(options).await
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = CatalogSettings::from_env()?;
    let cors = CorsConfig::from_env()?;
    init_logging(&logging_config(&settings))?;

    let db = connect_store(&settings).await?;
    Migrator::up(&db, None).await?;
    info!(
        backend = ?db.get_database_backend(),
        seed_route_enabled = settings.seed_route_enabled,
        "Snippet store ready"
    );

    build_server(&settings, cors, Arc::new(db)).start().await
}
