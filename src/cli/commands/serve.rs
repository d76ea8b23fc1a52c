use anyhow::Result;
use std::path::Path;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use super::initdb::run_migrations;
use super::seed::seed_database;
use crate::config::{connect, initialize_app_state};
use crate::router::create_router;

pub async fn serve(database_url: &str, bind_address: &str, fixture_path: &Path) -> Result<()> {
    trace!("Entering serve function");
    info!("Conduit application starting up");
    debug!("Bind address: {}", bind_address);

    let db = match connect(database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("{:#}", e);
            return Err(e);
        }
    };

    run_migrations(&db).await?;

    // Seeding completes before the listener exists, so no request sees a partly seeded store
    info!("Seeding database from {}", fixture_path.display());
    let outcome = seed_database(&db, fixture_path).await?;
    info!("Seeding finished: {:?}", outcome);

    // Initialize application state
    trace!("Initializing application state");
    let state = initialize_app_state(db);

    // Create router
    trace!("Creating application router");
    let app = create_router(state);
    debug!("Router created successfully");

    // Start server
    info!("Starting server on {}", bind_address);
    trace!("Attempting to bind TCP listener to {}", bind_address);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Conduit API server running on http://{}", bind_address);
    debug!("Server is ready to accept connections");

    trace!("Starting axum server");
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
