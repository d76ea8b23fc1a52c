use anyhow::{Context, Result};
use clap::Args;
use sea_orm::{Database, DatabaseConnection};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::schemas::AppState;

/// File name of the seed fixture inside the content root
pub const SEED_FILE_NAME: &str = "seed-data.json";

/// Where the seed fixture is read from.
#[derive(Args, Debug, Clone)]
pub struct SeedSource {
    /// Application content root; the fixture is looked up here
    #[arg(long, env = "CONTENT_ROOT", default_value = ".")]
    pub content_root: PathBuf,

    /// Explicit fixture path, overriding `<content root>/seed-data.json`
    #[arg(long, env = "SEED_FILE")]
    pub seed_file: Option<PathBuf>,
}

impl SeedSource {
    pub fn fixture_path(&self) -> PathBuf {
        self.seed_file
            .clone()
            .unwrap_or_else(|| self.content_root.join(SEED_FILE_NAME))
    }
}

/// Connect to the database at `database_url`
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database");
    debug!("Database URL: {}", database_url);
    Database::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))
}

/// Initialize application state around an open connection
pub fn initialize_app_state(db: DatabaseConnection) -> AppState {
    AppState { db }
}
