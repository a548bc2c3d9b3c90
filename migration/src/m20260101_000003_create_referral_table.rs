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
                    .table(Referral::Table)
                    .if_not_exists()
                    .col(pk_auto(Referral::Id))
                    .col(integer(Referral::ReferrerId))
                    .col(integer_uniq(Referral::ReferredId))
                    .col(
                        timestamp_with_time_zone(Referral::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_referral_referrer_id")
                            .from(Referral::Table, Referral::ReferrerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_referral_referred_id")
                            .from(Referral::Table, Referral::ReferredId)
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
            .drop_table(Table::drop().table(Referral::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Referral {
    Table,
    Id,
    ReferrerId,
    ReferredId,
    CreatedAt,
}
