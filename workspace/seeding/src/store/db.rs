use async_trait::async_trait;
use model::entities::prelude::*;
use model::entities::{tag, user};
use sea_orm::{
    DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, TransactionTrait,
};
use tracing::{debug, instrument, trace};

use super::{NewArticle, NewTag, NewUser, SeedStore, Staged};
use crate::error::Result;

/// SeaORM-backed store. Staged rows live in memory until [`SeedStore::commit`]
/// writes them inside a single database transaction.
#[derive(Debug)]
pub struct DbStore<'a> {
    db: &'a DatabaseConnection,
    staged: Staged,
}

impl<'a> DbStore<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            staged: Staged::default(),
        }
    }

    /// Number of rows waiting for the next commit.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }
}

#[async_trait]
impl<'a> SeedStore for DbStore<'a> {
    async fn any_users(&self) -> Result<bool> {
        Ok(User::find().one(self.db).await?.is_some())
    }

    async fn find_tag(&self, id: &str) -> Result<Option<tag::Model>> {
        Ok(Tag::find_by_id(id.to_string()).one(self.db).await?)
    }

    async fn first_user(&self) -> Result<Option<user::Model>> {
        Ok(User::find()
            .order_by_asc(user::Column::Id)
            .one(self.db)
            .await?)
    }

    fn stage_user(&mut self, user: NewUser) {
        self.staged.users.push(user);
    }

    fn stage_tag(&mut self, tag: NewTag) {
        self.staged.tags.push(tag);
    }

    fn stage_article(&mut self, article: NewArticle) {
        self.staged.articles.push(article);
    }

    fn is_tag_staged(&self, id: &str) -> bool {
        self.staged.has_tag(id)
    }

    fn discard(&mut self) {
        self.staged = Staged::default();
    }

    #[instrument(skip(self), fields(staged = self.staged.len()))]
    async fn commit(&mut self) -> Result<usize> {
        if self.staged.is_empty() {
            trace!("Nothing staged, skipping commit");
            return Ok(0);
        }

        let staged = self.staged.take();
        let txn = self.db.begin().await?;
        let mut written = 0;

        // Users first so articles in the same unit can reference them
        if !staged.users.is_empty() {
            written += User::insert_many(staged.users.into_iter().map(NewUser::into_active_model))
                .exec_without_returning(&txn)
                .await? as usize;
        }
        if !staged.tags.is_empty() {
            written += Tag::insert_many(staged.tags.into_iter().map(NewTag::into_active_model))
                .exec_without_returning(&txn)
                .await? as usize;
        }
        if !staged.articles.is_empty() {
            written += Article::insert_many(
                staged.articles.into_iter().map(NewArticle::into_active_model),
            )
            .exec_without_returning(&txn)
            .await? as usize;
        }

        txn.commit().await?;
        debug!("Committed {} rows", written);

        Ok(written)
    }
}
