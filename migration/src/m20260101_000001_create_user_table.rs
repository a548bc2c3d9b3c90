use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_uniq(User::Username))
                    .col(string_uniq(User::Email))
                    .col(string(User::PasswordHash))
                    .col(string_uniq(User::UploadKey))
                    .col(string_uniq(User::ReferralCode))
                    .col(integer(User::ReferralLimit))
                    .col(big_integer(User::UploadLimit))
                    .col(big_integer(User::SpaceUsed).default(0))
                    .col(boolean(User::Admin).default(false))
                    .col(boolean(User::EmailVerified).default(false))
                    .col(boolean(User::EmbedEnabled).default(false))
                    .col(string_null(User::EmbedTitle))
                    .col(string_null(User::EmbedDescription))
                    .col(string_null(User::EmbedAuthor))
                    .col(string_null(User::EmbedSiteName))
                    .col(string_len_null(User::EmbedColor, 7))
                    .col(string_len(User::UrlStyle, 16).default("DEFAULT"))
                    .col(string_len(User::Effect, 16).default("NONE"))
                    .col(integer_null(User::DomainId))
                    .col(string_len_null(User::Subdomain, 63))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone_null(User::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    UploadKey,
    ReferralCode,
    ReferralLimit,
    UploadLimit,
    SpaceUsed,
    Admin,
    EmailVerified,
    EmbedEnabled,
    EmbedTitle,
    EmbedDescription,
    EmbedAuthor,
    EmbedSiteName,
    EmbedColor,
    UrlStyle,
    Effect,
    DomainId,
    Subdomain,
    CreatedAt,
    DeletedAt,
}
