//! hireme API server.
//!
//! Loads configuration from the environment (and `.env` when present),
//! applies the database schema, and serves the HTTP API until interrupted.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use hireme::application::adapters::FilesystemResumeStore;
use hireme::application::ports::ResumeStoreError;
use hireme::config::{AppConfig, ConfigError};
use hireme::http::{AppState, ServiceSettings, router};
use hireme::identity::adapters::JwtIdentityProvider;
use hireme::payment::adapters::PostgresPaymentGateway;
use hireme::persistence::{PostgresHiringStore, apply_schema};
use hireme::telemetry;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build database pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("failed to apply database schema: {0}")]
    Schema(#[from] diesel::result::Error),
    #[error("schema task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("failed to open resume directory: {0}")]
    Resumes(#[from] ResumeStoreError),
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let dotenv = dotenvy::dotenv();
    let config = AppConfig::from_env()?;
    telemetry::init(config.log_format);
    if let Err(err) = dotenv {
        debug!(error = %err, "no .env file loaded");
    }
    info!(?config, "starting hireme");

    let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
    let pool = Pool::builder()
        .max_size(config.database_pool_size)
        .build(manager)?;
    let schema_pool = pool.clone();
    tokio::task::spawn_blocking(move || -> Result<(), StartupError> {
        let mut connection = schema_pool.get()?;
        apply_schema(&mut connection)?;
        Ok(())
    })
    .await??;
    info!("database schema ready");

    let store = Arc::new(PostgresHiringStore::new(pool.clone()));
    let gateway = Arc::new(PostgresPaymentGateway::new(pool));
    let identity = Arc::new(
        JwtIdentityProvider::new(config.jwt_secret.as_bytes())
            .with_token_ttl(chrono::Duration::seconds(config.token_ttl_secs)),
    );
    let resumes = Arc::new(FilesystemResumeStore::open(
        &config.resume_dir,
        config.max_resume_bytes,
    )?);
    let settings = ServiceSettings {
        application_fee: config.application_fee,
        gateway_timeout: config.gateway_timeout,
        max_upload_bytes: config.max_resume_bytes,
    };
    let app = router(AppState::new(store, gateway, identity, resumes, settings));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("received shutdown signal");
}
