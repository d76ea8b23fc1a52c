use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the seeding pipeline.
///
/// Per-record problems (a payload that does not fit its model) never show up here;
/// the seeder skips those records and keeps going.
#[derive(Error, Debug)]
pub enum SeedError {
    /// The fixture exists but could not be read
    #[error("Failed to read fixture {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fixture document is not a list of records
    #[error("Fixture parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The password hasher rejected its input
    #[error("Password hashing error: {0}")]
    Hash(String),

    /// Error from the backing store
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Type alias for Result with SeedError
pub type Result<T> = std::result::Result<T, SeedError>;
