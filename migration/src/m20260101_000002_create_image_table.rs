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
                    .table(Image::Table)
                    .if_not_exists()
                    .col(string_len(Image::Id, 16).primary_key())
                    .col(integer(Image::UploaderId))
                    .col(string(Image::OriginalName))
                    .col(string_len(Image::MimeType, 64))
                    .col(big_integer(Image::Size))
                    .col(string(Image::StorageKey))
                    .col(
                        timestamp_with_time_zone(Image::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone_null(Image::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_image_uploader_id")
                            .from(Image::Table, Image::UploaderId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_image_uploader_id")
                    .table(Image::Table)
                    .col(Image::UploaderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Image::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Image {
    Table,
    Id,
    UploaderId,
    OriginalName,
    MimeType,
    Size,
    StorageKey,
    CreatedAt,
    DeletedAt,
}
