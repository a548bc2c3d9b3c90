//! Image factory for creating test image entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test images owned by a given uploader.
pub struct ImageFactory<'a> {
    db: &'a DatabaseConnection,
    id: String,
    uploader_id: i32,
    original_name: String,
    mime_type: String,
    size: i64,
    deleted: bool,
}

impl<'a> ImageFactory<'a> {
    /// Defaults: id `"img{n}"`, a 1 KiB `image/png` named `"image{n}.png"`.
    pub fn new(db: &'a DatabaseConnection, uploader_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            id: format!("img{}", id),
            uploader_id,
            original_name: format!("image{}.png", id),
            mime_type: "image/png".to_string(),
            size: 1024,
            deleted: false,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = name.into();
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Builds and inserts the image entity. The storage key follows the server's
    /// `{uploader}/{id}.png` layout but no object is written.
    pub async fn build(self) -> Result<entity::image::Model, DbErr> {
        let now = Utc::now();
        entity::image::ActiveModel {
            storage_key: ActiveValue::Set(format!("{}/{}.png", self.uploader_id, self.id)),
            id: ActiveValue::Set(self.id),
            uploader_id: ActiveValue::Set(self.uploader_id),
            original_name: ActiveValue::Set(self.original_name),
            mime_type: ActiveValue::Set(self.mime_type),
            size: ActiveValue::Set(self.size),
            created_at: ActiveValue::Set(now),
            deleted_at: ActiveValue::Set(self.deleted.then_some(now)),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an image with default values for the given uploader.
pub async fn create_image(
    db: &DatabaseConnection,
    uploader_id: i32,
) -> Result<entity::image::Model, DbErr> {
    ImageFactory::new(db, uploader_id).build().await
}
