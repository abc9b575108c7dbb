use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string_len(Movie::Title, 255).not_null().unique_key())
                    .col(string_len(Movie::Poster, 500).not_null())
                    .col(string_len(Movie::Genre, 255).not_null())
                    .col(string_len(Movie::Duration, 50).not_null())
                    .col(double(Movie::Rating).not_null().default(0.0))
                    .col(text(Movie::Description).not_null())
                    .col(date(Movie::ReleaseDate).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movie::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Movie {
    Table,
    Id,
    Title,
    Poster,
    Genre,
    Duration,
    Rating,
    Description,
    ReleaseDate,
}
