use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::Server;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_actix_web::TracingLogger;

use crate::actions::{ActionRegistry, BigMarkerAction};
use crate::bigmarker_client::BigMarkerClient;
use crate::configuration::{BigMarkerSettings, DatabaseSettings};
use crate::profile_store::{InMemoryProfileStore, PgProfileStore, ProfileStore};
use crate::routes;

pub fn run(
    listener: TcpListener,
    registry: ActionRegistry,
    profile_store: Arc<dyn ProfileStore>,
) -> Result<Server, std::io::Error> {
    let registry = Data::new(registry);
    let profile_store: Data<dyn ProfileStore> = Data::from(profile_store);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health", web::get().to(routes::health_check))
            .route("/actions", web::get().to(routes::list_actions))
            .route("/actions/{name}/run", web::post().to(routes::run_action))
            .route("/actions/{name}/export", web::post().to(routes::export_action))
            .route("/users/{user_id}/profile", web::get().to(routes::user_profile))
            .app_data(registry.clone())
            .app_data(profile_store.clone())
    })
        .listen(listener)?
        .run();
    Ok(server)
}

/// Every form action the service offers, keyed by name.
pub fn build_action_registry(settings: &BigMarkerSettings) -> Result<ActionRegistry, anyhow::Error> {
    let client = BigMarkerClient::new(settings.url()?, settings.timeout())
        .context("Failed to build the BigMarker http client")?;
    let mut registry = ActionRegistry::default();
    registry.register(BigMarkerAction::new(client));
    Ok(registry)
}

pub async fn build_profile_store(
    settings: Option<&DatabaseSettings>,
) -> Result<Arc<dyn ProfileStore>, anyhow::Error> {
    match settings {
        Some(settings) => {
            let pool = PgPoolOptions::new()
                .acquire_timeout(Duration::from_secs(2))
                .connect_lazy_with(settings.with_db());
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to migrate the database")?;
            Ok(Arc::new(PgProfileStore::new(pool)))
        }
        None => {
            tracing::warn!("No database configured, profile fields are kept in memory");
            Ok(Arc::new(InMemoryProfileStore::default()))
        }
    }
}
