//! # Server Bootstrap
//!
//! Connects to the database, runs migrations, assembles the application
//! state and serves the API router.

use ::server::{auth::jwt::JwtConfig, phases::PhaseConfig, AppState};
use error::Result;
use migration::MigratorTrait;

use crate::ServeArgs;

pub async fn serve(args: &ServeArgs) -> Result<()> {
    logging::info!(target: "serve",
        host = %args.host,
        port = %args.port,
        "Starting API server..."
    );

    // Connect to the database
    let db = migration::SeaDb::new().await?;

    // Run migrations automatically on startup
    logging::info!(target: "serve", "Running database migrations...");
    migration::Migrator::up(&db.inner, None)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    logging::info!(target: "serve", "Database migrations completed successfully");

    let jwt_config = JwtConfig::from_env()?;
    let phase_config = PhaseConfig::from_env();
    if phase_config.strict_ordering {
        logging::info!(target: "serve", "Strict phase ordering enabled");
    }

    let state = AppState::new(db.inner, jwt_config, phase_config);
    let app = ::server::create_app_router(state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    logging::info!(target: "serve", address = %format!("{}:{}", args.host, args.port), "API server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
