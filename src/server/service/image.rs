//! Listing, resolving and deleting uploaded images.

use axum::body::Bytes;
use entity::log::LogKind;
use sea_orm::DatabaseConnection;

use crate::server::{
    config::Settings,
    data::{image::ImageRepository, user::UserRepository},
    error::{auth::AuthError, AppError},
    model::{
        image::{Image, LinkedImage},
        pagination::{clamp_per_page, Paginated},
        user::User,
    },
    service::{link::LinkService, log::LogService, storage::ObjectStore},
    util::slug::decode_slug,
};

pub struct ImageService<'a> {
    db: &'a DatabaseConnection,
    storage: &'a dyn ObjectStore,
    settings: &'a Settings,
}

impl<'a> ImageService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        storage: &'a dyn ObjectStore,
        settings: &'a Settings,
    ) -> Self {
        Self {
            db,
            storage,
            settings,
        }
    }

    /// Gets the user's live images newest first, with their share links.
    pub async fn list_own(
        &self,
        user: &User,
        page: u64,
        per_page: u64,
    ) -> Result<Paginated<LinkedImage>, AppError> {
        let per_page = clamp_per_page(per_page);
        let (images, total) = ImageRepository::new(self.db)
            .get_by_uploader_paginated(user.id, page, per_page)
            .await?;

        let link_service = LinkService::new(self.db, self.settings);
        let base_url = link_service.base_url_for(user).await?;

        Ok(Paginated::new(images, total, page, per_page).map(|image| LinkedImage {
            links: link_service.links(&base_url, user, &image),
            image,
        }))
    }

    /// Finds a live image from a slug in either URL style.
    ///
    /// # Returns
    /// - `Ok(Image)` - The live image
    /// - `Err(AppError::NotFound)` - Slug undecodable, unknown or deleted
    pub async fn resolve(&self, slug: &str) -> Result<Image, AppError> {
        let id = decode_slug(slug).ok_or_else(not_found)?;

        ImageRepository::new(self.db)
            .find_live(&id)
            .await?
            .ok_or_else(not_found)
    }

    /// Loads the stored bytes of a live image.
    pub async fn raw(&self, slug: &str) -> Result<(Image, Bytes), AppError> {
        let image = self.resolve(slug).await?;
        let bytes = self.storage.get(&image.storage_key).await?;

        Ok((image, bytes))
    }

    /// Soft-deletes an image, removes its bytes and gives the space back.
    ///
    /// Only the uploader and admins may delete. A failure to remove the stored object
    /// is logged and does not undo the deletion.
    ///
    /// # Returns
    /// - `Ok(())` - Image deleted
    /// - `Err(AppError::NotFound)` - No live image with that ID
    /// - `Err(AuthError::AccessDenied)` - Actor is neither uploader nor admin
    pub async fn delete(&self, actor: &User, id: &str) -> Result<(), AppError> {
        let image_repo = ImageRepository::new(self.db);

        let image = image_repo.find_live(id).await?.ok_or_else(not_found)?;
        if image.uploader_id != actor.id && !actor.admin {
            return Err(
                AuthError::AccessDenied(actor.id, format!("delete image {}", image.id)).into(),
            );
        }

        if !image_repo.soft_delete(&image.id).await? {
            return Err(not_found());
        }

        if let Err(e) = self.storage.delete(&image.storage_key).await {
            tracing::warn!("Failed to remove object {}: {}", image.storage_key, e);
        }

        UserRepository::new(self.db)
            .release_space(image.uploader_id, image.size)
            .await?;

        let kind = if image.uploader_id == actor.id {
            LogKind::Upload
        } else {
            LogKind::Admin
        };
        LogService::new(self.db)
            .record(
                kind,
                format!("{} deleted image {}", actor.username, image.id),
                Some(actor.id),
            )
            .await;

        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Image not found".to_string())
}
