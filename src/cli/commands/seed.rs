use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;
use seeding::{Argon2Hasher, DbStore, MemoryStore, SeedOutcome, Seeder};
use std::path::Path;
use tracing::{debug, info, trace};

use super::initdb::run_migrations;
use crate::config::connect;

/// Seed the database at `database_url` from `fixture_path`, or dry-run it in memory
pub async fn seed(database_url: &str, fixture_path: &Path, dry_run: bool) -> Result<()> {
    trace!("Entering seed function");
    debug!("Fixture path: {}", fixture_path.display());

    let outcome = if dry_run {
        info!("Dry run: seeding an in-memory store");
        let mut seeder = Seeder::new(fixture_path, MemoryStore::default(), Argon2Hasher);
        seeder.seed().await.context("Seeding failed")?
    } else {
        let db = connect(database_url).await?;
        run_migrations(&db).await?;
        seed_database(&db, fixture_path).await?
    };

    println!("{}", describe(&outcome));
    Ok(())
}

/// Run the seeding pipeline once against `db`
pub async fn seed_database(db: &DatabaseConnection, fixture_path: &Path) -> Result<SeedOutcome> {
    let mut seeder = Seeder::new(fixture_path, DbStore::new(db), Argon2Hasher);
    let outcome = seeder
        .seed()
        .await
        .with_context(|| format!("Failed to seed from {}", fixture_path.display()))?;
    debug!("Seeding outcome: {:?}", outcome);
    Ok(outcome)
}

fn describe(outcome: &SeedOutcome) -> String {
    match outcome {
        SeedOutcome::MissingFixture => "No seed file found, nothing seeded".to_string(),
        SeedOutcome::AlreadySeeded => "Database already has users, nothing seeded".to_string(),
        SeedOutcome::EmptyFixture => "Seed file has no records, nothing seeded".to_string(),
        SeedOutcome::Seeded(summary) => format!(
            "Seeded {} users, {} tags, {} articles ({} records skipped)",
            summary.users, summary.tags, summary.articles, summary.skipped
        ),
    }
}
