//! The narrow store capability the seeder needs.
//!
//! Rows are staged first and only become durable on [`SeedStore::commit`], which writes
//! everything staged since the previous commit as one unit.

pub mod db;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::entities::{article, tag, user};
use sea_orm::{IntoActiveModel, Set};

use crate::error::Result;

pub use db::DbStore;
pub use memory::MemoryStore;

/// A user waiting to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub bio: String,
    pub image: String,
}

/// A tag waiting to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub id: String,
    pub name: String,
}

/// An article waiting to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IntoActiveModel<user::ActiveModel> for NewUser {
    fn into_active_model(self) -> user::ActiveModel {
        user::ActiveModel {
            username: Set(self.username),
            email: Set(self.email),
            password_hash: Set(self.password_hash),
            bio: Set(self.bio),
            image: Set(self.image),
            ..Default::default()
        }
    }
}

impl IntoActiveModel<tag::ActiveModel> for NewTag {
    fn into_active_model(self) -> tag::ActiveModel {
        tag::ActiveModel {
            id: Set(self.id),
            name: Set(self.name),
        }
    }
}

impl IntoActiveModel<article::ActiveModel> for NewArticle {
    fn into_active_model(self) -> article::ActiveModel {
        article::ActiveModel {
            slug: Set(self.slug),
            title: Set(self.title),
            description: Set(self.description),
            body: Set(self.body),
            author_id: Set(self.author_id),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
            ..Default::default()
        }
    }
}

/// Rows staged since the last commit.
#[derive(Debug, Clone, Default)]
pub struct Staged {
    pub users: Vec<NewUser>,
    pub tags: Vec<NewTag>,
    pub articles: Vec<NewArticle>,
}

impl Staged {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.users.len() + self.tags.len() + self.articles.len()
    }

    pub fn has_tag(&self, id: &str) -> bool {
        self.tags.iter().any(|t| t.id == id)
    }

    /// Takes every staged row, leaving the set empty.
    pub fn take(&mut self) -> Staged {
        std::mem::take(self)
    }
}

/// Store operations used by the seeding pipeline.
#[async_trait]
pub trait SeedStore: Send + Sync {
    /// Whether at least one user has been committed.
    async fn any_users(&self) -> Result<bool>;

    /// Committed tag with this id. Staged tags are not visible here.
    async fn find_tag(&self, id: &str) -> Result<Option<tag::Model>>;

    /// First committed user in the store's natural (id) order.
    async fn first_user(&self) -> Result<Option<user::Model>>;

    fn stage_user(&mut self, user: NewUser);

    fn stage_tag(&mut self, tag: NewTag);

    fn stage_article(&mut self, article: NewArticle);

    /// Whether a tag with this id is staged but not yet committed.
    fn is_tag_staged(&self, id: &str) -> bool;

    /// Drops every staged row without writing it.
    fn discard(&mut self);

    /// Writes all staged rows as one unit and returns how many were written.
    async fn commit(&mut self) -> Result<usize>;
}
