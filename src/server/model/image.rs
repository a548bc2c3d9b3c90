use chrono::{DateTime, Utc};

use crate::{
    model::image::{AdminImageDto, ImageDto, PaginatedAdminImagesDto, PaginatedImagesDto},
    server::model::pagination::Paginated,
};

/// Stored upload. `id` is the public slug.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub id: String,
    pub uploader_id: i32,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    /// Object store key, `{uploader_id}/{id}.{ext}`.
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Public links for an image, built from the uploader's preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLinks {
    pub url: String,
    pub raw_url: String,
    pub delete_url: String,
}

impl Image {
    pub fn into_dto(self, links: ImageLinks) -> ImageDto {
        ImageDto {
            id: self.id,
            original_name: self.original_name,
            mime_type: self.mime_type,
            size: self.size,
            url: links.url,
            raw_url: links.raw_url,
            delete_url: links.delete_url,
            created_at: self.created_at,
        }
    }

    pub fn from_entity(entity: entity::image::Model) -> Self {
        Self {
            id: entity.id,
            uploader_id: entity.uploader_id,
            original_name: entity.original_name,
            mime_type: entity.mime_type,
            size: entity.size,
            storage_key: entity.storage_key,
            created_at: entity.created_at,
            deleted_at: entity.deleted_at,
        }
    }
}

/// Image together with the links it is shared under.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedImage {
    pub image: Image,
    pub links: ImageLinks,
}

impl LinkedImage {
    pub fn into_dto(self) -> ImageDto {
        self.image.into_dto(self.links)
    }
}

impl Paginated<LinkedImage> {
    pub fn into_dto(self) -> PaginatedImagesDto {
        PaginatedImagesDto {
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
            images: self.items.into_iter().map(LinkedImage::into_dto).collect(),
        }
    }
}

/// Image listed in the admin back-office together with the uploader's name.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageWithUploader {
    pub image: Image,
    pub uploader: Option<String>,
}

impl ImageWithUploader {
    pub fn into_dto(self) -> AdminImageDto {
        AdminImageDto {
            id: self.image.id,
            original_name: self.image.original_name,
            mime_type: self.image.mime_type,
            size: self.image.size,
            uploader_id: self.image.uploader_id,
            uploader: self.uploader,
            created_at: self.image.created_at,
        }
    }
}

impl Paginated<ImageWithUploader> {
    pub fn into_dto(self) -> PaginatedAdminImagesDto {
        PaginatedAdminImagesDto {
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
            images: self
                .items
                .into_iter()
                .map(ImageWithUploader::into_dto)
                .collect(),
        }
    }
}

/// Row written for a new upload.
#[derive(Debug, Clone)]
pub struct CreateImageParam {
    pub id: String,
    pub uploader_id: i32,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub storage_key: String,
}
