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
                    .table(Verification::Table)
                    .if_not_exists()
                    .col(pk_auto(Verification::Id))
                    .col(integer(Verification::UserId))
                    .col(string_len(Verification::Kind, 16))
                    .col(string_uniq(Verification::Code))
                    .col(timestamp_with_time_zone(Verification::ExpiresAt))
                    .col(
                        timestamp_with_time_zone(Verification::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_verification_user_id")
                            .from(Verification::Table, Verification::UserId)
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
            .drop_table(Table::drop().table(Verification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Verification {
    Table,
    Id,
    UserId,
    Kind,
    Code,
    ExpiresAt,
    CreatedAt,
}
