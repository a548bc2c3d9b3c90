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
                    .table(Domain::Table)
                    .if_not_exists()
                    .col(pk_auto(Domain::Id))
                    .col(string_uniq(Domain::Url))
                    .col(integer(Domain::DonatorId))
                    .col(string_len(Domain::Progress, 16).default("INPUT"))
                    .col(string_null(Domain::ZoneId))
                    .col(text_null(Domain::Nameservers))
                    .col(boolean(Domain::Public).default(true))
                    .col(
                        timestamp_with_time_zone(Domain::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_domain_donator_id")
                            .from(Domain::Table, Domain::DonatorId)
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
            .drop_table(Table::drop().table(Domain::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Domain {
    Table,
    Id,
    Url,
    DonatorId,
    Progress,
    ZoneId,
    Nameservers,
    Public,
    CreatedAt,
}
