use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Theater::Table)
                    .if_not_exists()
                    .col(pk_auto(Theater::Id))
                    .col(string_len(Theater::Name, 255).not_null().unique_key())
                    .col(string_len(Theater::City, 100).not_null())
                    .col(integer(Theater::Screens).not_null().default(1))
                    // One principal manages at most one theater
                    .col(uuid_null(Theater::ManagerId).unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_theater_manager")
                            .from(Theater::Table, Theater::ManagerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Theater::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Theater {
    Table,
    Id,
    Name,
    City,
    Screens,
    ManagerId,
}
