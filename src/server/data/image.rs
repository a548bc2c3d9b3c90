//! Image data repository.
//!
//! Images are soft-deleted: `deleted_at` hides them from every listing and lookup
//! here, while the purge trigger removes the rows of deleted accounts for good.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ExprTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::image::{CreateImageParam, Image, ImageWithUploader};

pub struct ImageRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ImageRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreateImageParam) -> Result<Image, DbErr> {
        let entity = entity::image::ActiveModel {
            id: ActiveValue::Set(param.id),
            uploader_id: ActiveValue::Set(param.uploader_id),
            original_name: ActiveValue::Set(param.original_name),
            mime_type: ActiveValue::Set(param.mime_type),
            size: ActiveValue::Set(param.size),
            storage_key: ActiveValue::Set(param.storage_key),
            created_at: ActiveValue::Set(Utc::now()),
            deleted_at: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        Ok(Image::from_entity(entity))
    }

    /// Whether any row, deleted or not, already uses `id`.
    pub async fn id_exists(&self, id: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::Image::find_by_id(id.to_string())
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Finds an image that has not been deleted.
    pub async fn find_live(&self, id: &str) -> Result<Option<Image>, DbErr> {
        let entity = entity::prelude::Image::find_by_id(id.to_string())
            .filter(entity::image::Column::DeletedAt.is_null())
            .one(self.db)
            .await?;

        Ok(entity.map(Image::from_entity))
    }

    /// Gets one user's live images, newest first.
    ///
    /// # Returns
    /// - `Ok((images, total))` - Images for the page and the user's total live image count
    pub async fn get_by_uploader_paginated(
        &self,
        uploader_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Image>, u64), DbErr> {
        let paginator = entity::prelude::Image::find()
            .filter(entity::image::Column::UploaderId.eq(uploader_id))
            .filter(entity::image::Column::DeletedAt.is_null())
            .order_by_desc(entity::image::Column::CreatedAt)
            .order_by_desc(entity::image::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page).await?;

        Ok((entities.into_iter().map(Image::from_entity).collect(), total))
    }

    /// Gets live images across all users with uploader names, newest first.
    pub async fn get_all_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<ImageWithUploader>, u64), DbErr> {
        let paginator = entity::prelude::Image::find()
            .filter(entity::image::Column::DeletedAt.is_null())
            .find_also_related(entity::prelude::User)
            .order_by_desc(entity::image::Column::CreatedAt)
            .order_by_desc(entity::image::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page).await?;

        let images = rows
            .into_iter()
            .map(|(image, uploader)| ImageWithUploader {
                image: Image::from_entity(image),
                uploader: uploader.map(|u| u.username),
            })
            .collect();

        Ok((images, total))
    }

    /// All images of one uploader, including soft-deleted ones.
    pub async fn get_all_by_uploader(&self, uploader_id: i32) -> Result<Vec<Image>, DbErr> {
        let entities = entity::prelude::Image::find()
            .filter(entity::image::Column::UploaderId.eq(uploader_id))
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Image::from_entity).collect())
    }

    /// Marks an image deleted.
    ///
    /// # Returns
    /// - `Ok(true)` - The image was live and is now deleted
    /// - `Ok(false)` - No live image with that ID
    pub async fn soft_delete(&self, id: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::Image::update_many()
            .filter(entity::image::Column::Id.eq(id))
            .filter(entity::image::Column::DeletedAt.is_null())
            .col_expr(entity::image::Column::DeletedAt, Expr::value(Utc::now()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Permanently removes every image row of an uploader.
    pub async fn hard_delete_by_uploader(&self, uploader_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Image::delete_many()
            .filter(entity::image::Column::UploaderId.eq(uploader_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn count_live(&self) -> Result<u64, DbErr> {
        entity::prelude::Image::find()
            .filter(entity::image::Column::DeletedAt.is_null())
            .count(self.db)
            .await
    }

    /// Sum of the sizes of all live images, in bytes.
    pub async fn total_size(&self) -> Result<i64, DbErr> {
        let total: Option<Option<i64>> = entity::prelude::Image::find()
            .select_only()
            .column_as(Expr::col(entity::image::Column::Size).sum(), "total")
            .filter(entity::image::Column::DeletedAt.is_null())
            .into_tuple()
            .one(self.db)
            .await?;

        Ok(total.flatten().unwrap_or(0))
    }
}
