use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trigger::Table)
                    .if_not_exists()
                    .col(pk_auto(Trigger::Id))
                    .col(string_len(Trigger::Kind, 32))
                    .col(integer(Trigger::TargetId))
                    .col(integer(Trigger::Attempts).default(0))
                    .col(timestamp_with_time_zone(Trigger::RunAfter))
                    .col(
                        timestamp_with_time_zone(Trigger::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trigger_run_after")
                    .table(Trigger::Table)
                    .col(Trigger::RunAfter)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trigger::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Trigger {
    Table,
    Id,
    Kind,
    TargetId,
    Attempts,
    RunAfter,
    CreatedAt,
}
