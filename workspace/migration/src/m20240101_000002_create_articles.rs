use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::{article, user};
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create articles table
        manager
            .create_table(
                Table::create()
                    .table(Article::table())
                    .if_not_exists()
                    .col(pk_auto(Article::column(article::Column::Id)))
                    .col(string(Article::column(article::Column::Slug)).unique_key())
                    .col(string(Article::column(article::Column::Title)))
                    .col(string(Article::column(article::Column::Description)))
                    .col(text(Article::column(article::Column::Body)))
                    .col(integer(Article::column(article::Column::AuthorId)))
                    .col(timestamp_with_time_zone(Article::column(
                        article::Column::CreatedAt,
                    )))
                    .col(timestamp_with_time_zone(Article::column(
                        article::Column::UpdatedAt,
                    )))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_articles_author")
                            .from(
                                Article::table(),
                                Article::column(article::Column::AuthorId),
                            )
                            .to(User::table(), User::column(user::Column::Id))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_articles_author_id")
                    .table(Article::table())
                    .col(Article::column(article::Column::AuthorId))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dropping the table drops its index as well
        manager
            .drop_table(Table::drop().table(Article::table()).to_owned())
            .await?;

        Ok(())
    }
}
