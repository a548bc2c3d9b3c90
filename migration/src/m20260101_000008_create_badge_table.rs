use sea_orm_migration::{prelude::*, schema::*};

use super::m20260101_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Badge::Table)
                    .if_not_exists()
                    .col(pk_auto(Badge::Id))
                    .col(integer(Badge::UserId))
                    .col(string_len(Badge::Name, 32))
                    .col(
                        timestamp_with_time_zone(Badge::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_badge_user_id")
                            .from(Badge::Table, Badge::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Badge::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Badge {
    Table,
    Id,
    UserId,
    Name,
    CreatedAt,
}
