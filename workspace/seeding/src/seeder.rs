use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::{Result, SeedError};
use crate::fixture::{ARTICLE_MODEL, Fixture, SeedRecord, TAG_MODEL, USER_MODEL};
use crate::hasher::CredentialHasher;
use crate::store::{NewArticle, NewTag, NewUser, SeedStore};

/// Rows written by a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub tags: usize,
    pub articles: usize,
    /// Malformed records, duplicate tags and articles without an author.
    pub skipped: usize,
}

/// How a call to [`Seeder::seed`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// No fixture at the configured path.
    MissingFixture,
    /// The store already had users; the fixture was not read.
    AlreadySeeded,
    /// The fixture holds no records.
    EmptyFixture,
    Seeded(SeedSummary),
}

/// Populates an empty store from a JSON fixture, at most once per store.
///
/// The run goes users, then tags, then articles, committing after each phase. Every
/// seeded article is assigned to the first user in the store after the user phase,
/// since the fixture format carries no per-article author.
pub struct Seeder<S, H> {
    fixture_path: PathBuf,
    store: S,
    hasher: H,
}

impl<S: SeedStore, H: CredentialHasher> Seeder<S, H> {
    pub fn new(fixture_path: impl Into<PathBuf>, store: S, hasher: H) -> Self {
        Self {
            fixture_path: fixture_path.into(),
            store,
            hasher,
        }
    }

    pub fn fixture_path(&self) -> &Path {
        &self.fixture_path
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs the pipeline. Any I/O, document, hashing or store failure is logged and returned.
    #[instrument(skip(self), fields(fixture = %self.fixture_path.display()))]
    pub async fn seed(&mut self) -> Result<SeedOutcome> {
        match self.run().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(error = %e, "Seeding failed");
                // Rows staged by the failed phase must not leak into a later run
                self.store.discard();
                Err(e)
            }
        }
    }

    async fn run(&mut self) -> Result<SeedOutcome> {
        trace!("Checking for fixture file");
        let exists = tokio::fs::try_exists(&self.fixture_path)
            .await
            .map_err(|source| self.io_error(source))?;
        if !exists {
            warn!("Seed file missing at {}", self.fixture_path.display());
            return Ok(SeedOutcome::MissingFixture);
        }

        if self.store.any_users().await? {
            debug!("Store already has users, skipping seeding");
            return Ok(SeedOutcome::AlreadySeeded);
        }

        let json = tokio::fs::read_to_string(&self.fixture_path)
            .await
            .map_err(|source| self.io_error(source))?;
        let fixture = Fixture::parse(&json)?;
        if fixture.is_empty() {
            info!("Seed file has no records, nothing to seed");
            return Ok(SeedOutcome::EmptyFixture);
        }
        info!("Loaded {} records from seed file", fixture.len());

        let mut summary = SeedSummary::default();

        self.stage_users(&fixture, &mut summary)?;
        self.store.commit().await?;
        info!("Seeded {} users", summary.users);

        self.stage_tags(&fixture, &mut summary).await?;
        self.store.commit().await?;
        info!("Seeded {} tags", summary.tags);

        self.stage_articles(&fixture, &mut summary).await?;
        self.store.commit().await?;
        info!("Seeded {} articles", summary.articles);

        if summary.skipped > 0 {
            info!("Skipped {} seed records", summary.skipped);
        }

        Ok(SeedOutcome::Seeded(summary))
    }

    fn stage_users(&mut self, fixture: &Fixture, summary: &mut SeedSummary) -> Result<()> {
        for record in fixture.records_for(USER_MODEL) {
            let SeedRecord::User(seed) = record else {
                skip(record, summary);
                continue;
            };

            let password_hash = self.hasher.hash(&seed.password)?;
            self.store.stage_user(NewUser {
                username: seed.username.clone(),
                email: seed.email.clone(),
                password_hash,
                bio: seed.bio.clone(),
                image: seed.image.clone().unwrap_or_default(),
            });
            summary.users += 1;
            debug!("Staged user {}", seed.username);
        }
        Ok(())
    }

    async fn stage_tags(&mut self, fixture: &Fixture, summary: &mut SeedSummary) -> Result<()> {
        for record in fixture.records_for(TAG_MODEL) {
            let SeedRecord::Tag(seed) = record else {
                skip(record, summary);
                continue;
            };

            // The same id may already be committed or staged earlier in this phase
            if self.store.is_tag_staged(&seed.id) || self.store.find_tag(&seed.id).await?.is_some() {
                debug!("Tag {} already present, skipping", seed.id);
                summary.skipped += 1;
                continue;
            }

            self.store.stage_tag(NewTag {
                id: seed.id.clone(),
                name: seed.name().to_string(),
            });
            summary.tags += 1;
        }
        Ok(())
    }

    async fn stage_articles(&mut self, fixture: &Fixture, summary: &mut SeedSummary) -> Result<()> {
        let author = self.store.first_user().await?;
        if author.is_none() && fixture.records_for(ARTICLE_MODEL).next().is_some() {
            warn!("No user to author seeded articles, skipping them");
        }

        for record in fixture.records_for(ARTICLE_MODEL) {
            let SeedRecord::Article(seed) = record else {
                skip(record, summary);
                continue;
            };
            let Some(author) = author.as_ref() else {
                summary.skipped += 1;
                continue;
            };

            self.store.stage_article(NewArticle {
                slug: seed.slug.clone(),
                title: seed.title.clone(),
                description: seed.description.clone(),
                body: seed.body.clone(),
                author_id: author.id,
                created_at: seed.created_at,
                updated_at: seed.updated_at,
            });
            summary.articles += 1;
            debug!("Staged article {} by {}", seed.slug, author.username);
        }
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> SeedError {
        SeedError::Io {
            path: self.fixture_path.clone(),
            source,
        }
    }
}

fn skip(record: &SeedRecord, summary: &mut SeedSummary) {
    if let SeedRecord::Malformed { model, reason } = record {
        debug!("Skipping malformed {} record: {}", model, reason);
    }
    summary.skipped += 1;
}
