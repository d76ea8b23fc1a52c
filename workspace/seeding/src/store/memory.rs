use async_trait::async_trait;
use model::entities::{article, tag, user};
use sea_orm::DbErr;

use super::{NewArticle, NewTag, NewUser, SeedStore, Staged};
use crate::error::Result;

/// In-memory store with the same staging and commit semantics as the database.
///
/// Ids are assigned on commit in insertion order, which is also the natural order
/// `first_user` uses. Commits enforce the same uniqueness and author constraints as the
/// schema and write nothing when one is violated.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Vec<user::Model>,
    tags: Vec<tag::Model>,
    articles: Vec<article::Model>,
    staged: Staged,
}

impl MemoryStore {
    pub fn users(&self) -> &[user::Model] {
        &self.users
    }

    pub fn tags(&self) -> &[tag::Model] {
        &self.tags
    }

    pub fn articles(&self) -> &[article::Model] {
        &self.articles
    }

    /// Number of rows waiting for the next commit.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    fn check_constraints(&self, staged: &Staged) -> std::result::Result<(), DbErr> {
        let mut usernames: Vec<&str> = self.users.iter().map(|u| u.username.as_str()).collect();
        let mut emails: Vec<&str> = self.users.iter().map(|u| u.email.as_str()).collect();
        for user in &staged.users {
            if usernames.contains(&user.username.as_str()) {
                return Err(violation("users.username", &user.username));
            }
            if emails.contains(&user.email.as_str()) {
                return Err(violation("users.email", &user.email));
            }
            usernames.push(&user.username);
            emails.push(&user.email);
        }

        let mut tag_ids: Vec<&str> = self.tags.iter().map(|t| t.id.as_str()).collect();
        for tag in &staged.tags {
            if tag_ids.contains(&tag.id.as_str()) {
                return Err(violation("tags.id", &tag.id));
            }
            tag_ids.push(&tag.id);
        }

        let user_count = (self.users.len() + staged.users.len()) as i32;
        let mut slugs: Vec<&str> = self.articles.iter().map(|a| a.slug.as_str()).collect();
        for article in &staged.articles {
            if slugs.contains(&article.slug.as_str()) {
                return Err(violation("articles.slug", &article.slug));
            }
            if article.author_id < 1 || article.author_id > user_count {
                return Err(DbErr::Custom(format!(
                    "FOREIGN KEY constraint failed: articles.author_id = {}",
                    article.author_id
                )));
            }
            slugs.push(&article.slug);
        }

        Ok(())
    }
}

fn violation(column: &str, value: &str) -> DbErr {
    DbErr::Custom(format!("UNIQUE constraint failed: {column} = '{value}'"))
}

#[async_trait]
impl SeedStore for MemoryStore {
    async fn any_users(&self) -> Result<bool> {
        Ok(!self.users.is_empty())
    }

    async fn find_tag(&self, id: &str) -> Result<Option<tag::Model>> {
        Ok(self.tags.iter().find(|t| t.id == id).cloned())
    }

    async fn first_user(&self) -> Result<Option<user::Model>> {
        Ok(self.users.first().cloned())
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

    async fn commit(&mut self) -> Result<usize> {
        let staged = self.staged.take();
        self.check_constraints(&staged)?;
        let written = staged.len();

        for new in staged.users {
            let id = self.users.len() as i32 + 1;
            self.users.push(user::Model {
                id,
                username: new.username,
                email: new.email,
                password_hash: new.password_hash,
                bio: new.bio,
                image: new.image,
            });
        }
        self.tags.extend(staged.tags.into_iter().map(|new| tag::Model {
            id: new.id,
            name: new.name,
        }));
        for new in staged.articles {
            let id = self.articles.len() as i32 + 1;
            self.articles.push(article::Model {
                id,
                slug: new.slug,
                title: new.title,
                description: new.description,
                body: new.body,
                author_id: new.author_id,
                created_at: new.created_at,
                updated_at: new.updated_at,
            });
        }

        Ok(written)
    }
}
