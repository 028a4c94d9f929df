use std::{error::Error, sync::Arc};

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{
    fmt::time::LocalTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::{
    adapters::outbound::{
        media::DynamicImageCodec, postgres::PostgresProfileRepository,
        storage::LocalDiskBlobStore,
    },
    app_state::AppState,
    domain::services::{AvatarProcessor, ProfileServiceImpl},
};

mod adapters;
mod app_state;
mod auth;
mod config;
mod domain;
mod router;
mod routes;
#[cfg(test)]
mod test_support;

const PUBLIC_NAMESPACE: &str = "public";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "profile_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_timer(LocalTime::rfc_3339()))
        .init();

    let config = config::read_config()?;

    let connection_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(config.database.with_db())
        .await?;
    sqlx::migrate!().run(&connection_pool).await?;
    info!("Database migrations applied");

    let storage = LocalDiskBlobStore::new(
        PUBLIC_NAMESPACE,
        config.storage.public_root.clone(),
        config.storage.public_url.clone(),
    );
    storage.initialize().await?;

    let avatars = AvatarProcessor::new(
        Arc::new(DynamicImageCodec::default()),
        Arc::new(storage),
        config.avatar,
    );
    let repository = Arc::new(PostgresProfileRepository::new(connection_pool));
    let profile_service = ProfileServiceImpl::new(repository, avatars);

    let app = router::create(AppState::new(Arc::new(profile_service)), &config);

    let addr = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
