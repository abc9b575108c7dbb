use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000002_create_movies::Movie;
use super::m20240301_000003_create_theaters::Theater;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Show::Table)
                    .if_not_exists()
                    .col(pk_auto(Show::Id))
                    .col(integer(Show::MovieId).not_null())
                    .col(integer(Show::TheaterId).not_null())
                    .col(string_len(Show::Time, 50).not_null())
                    .col(decimal_len(Show::Price, 10, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_show_movie")
                            .from(Show::Table, Show::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_show_theater")
                            .from(Show::Table, Show::TheaterId)
                            .to(Theater::Table, Theater::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Show::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Show {
    Table,
    Id,
    MovieId,
    TheaterId,
    Time,
    Price,
}
