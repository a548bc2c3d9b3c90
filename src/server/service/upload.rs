//! Image uploads.
//!
//! An upload is accepted only from a user with a verified email, for one of the
//! supported image types, within the per-file size limit and the user's storage quota.
//! Quota is reserved in the database before the bytes are written so concurrent
//! uploads cannot overshoot the limit; the reservation is released if any later step
//! fails.

use axum::body::Bytes;
use entity::log::LogKind;
use sea_orm::DatabaseConnection;

use crate::server::{
    config::Settings,
    data::{image::ImageRepository, user::UserRepository},
    error::{auth::AuthError, internal::InternalError, AppError},
    model::{
        image::{CreateImageParam, Image},
        user::User,
    },
    service::{log::LogService, storage::ObjectStore},
    util::{random::alphanumeric, template::format_bytes},
};

/// Supported content types and the file extension they are stored with.
pub const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/bmp", "bmp"),
    ("image/tiff", "tiff"),
    ("image/svg+xml", "svg"),
    ("image/x-icon", "ico"),
];

pub const SLUG_LENGTH: usize = 8;
const MAX_SLUG_ATTEMPTS: usize = 10;
const MAX_NAME_LENGTH: usize = 255;

/// Returns the stored extension for a supported content type.
///
/// Parameters such as `; charset=utf-8` are ignored and matching is case-insensitive.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    ALLOWED_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == mime)
        .map(|(_, ext)| *ext)
}

/// File received from the multipart body.
pub struct UploadParam {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

pub struct UploadService<'a> {
    db: &'a DatabaseConnection,
    storage: &'a dyn ObjectStore,
    settings: &'a Settings,
}

impl<'a> UploadService<'a> {
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

    /// Stores an uploaded image for `user`.
    ///
    /// # Returns
    /// - `Ok(Image)` - Stored image row
    /// - `Err(AuthError::EmailNotVerified)` - Uploader has not verified their email
    /// - `Err(AppError::BadRequest)` - Empty file or unsupported content type
    /// - `Err(AppError::PayloadTooLarge)` - File above the size limit or over quota
    pub async fn upload(&self, user: &User, param: UploadParam) -> Result<Image, AppError> {
        if !user.email_verified {
            return Err(AuthError::EmailNotVerified(user.id).into());
        }

        let extension = extension_for(&param.content_type).ok_or_else(|| {
            AppError::BadRequest(format!("Unsupported file type: {}", param.content_type))
        })?;

        if param.bytes.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }

        let size = param.bytes.len() as u64;
        if size > self.settings.max_upload_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the {} upload limit",
                format_bytes(self.settings.max_upload_size)
            )));
        }

        let user_repo = UserRepository::new(self.db);
        if !user_repo.try_reserve_space(user.id, size as i64).await? {
            return Err(AppError::PayloadTooLarge(format!(
                "Storage quota exceeded: {} of {} used",
                format_bytes(user.space_used.max(0) as u64),
                format_bytes(user.upload_limit.max(0) as u64)
            )));
        }

        match self.store(user, param, extension, size as i64).await {
            Ok(image) => {
                LogService::new(self.db)
                    .record(
                        LogKind::Upload,
                        format!(
                            "{} uploaded {} ({})",
                            user.username,
                            image.id,
                            format_bytes(size)
                        ),
                        Some(user.id),
                    )
                    .await;

                Ok(image)
            }
            Err(e) => {
                user_repo.release_space(user.id, size as i64).await?;
                Err(e)
            }
        }
    }

    async fn store(
        &self,
        user: &User,
        param: UploadParam,
        extension: &str,
        size: i64,
    ) -> Result<Image, AppError> {
        let slug = self.unique_slug().await?;
        let storage_key = format!("{}/{}.{}", user.id, slug, extension);
        let mime_type = ALLOWED_TYPES
            .iter()
            .find(|(_, ext)| *ext == extension)
            .map(|(mime, _)| mime.to_string())
            .unwrap_or_else(|| param.content_type.clone());

        self.storage
            .put(&storage_key, param.bytes, &mime_type)
            .await?;

        let created = ImageRepository::new(self.db)
            .create(CreateImageParam {
                id: slug,
                uploader_id: user.id,
                original_name: clean_file_name(param.file_name.as_deref(), extension),
                mime_type,
                size,
                storage_key: storage_key.clone(),
            })
            .await;

        match created {
            Ok(image) => Ok(image),
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&storage_key).await {
                    tracing::warn!("Failed to remove orphaned object {}: {}", storage_key, cleanup);
                }
                Err(e.into())
            }
        }
    }

    async fn unique_slug(&self) -> Result<String, AppError> {
        let repo = ImageRepository::new(self.db);

        for _ in 0..MAX_SLUG_ATTEMPTS {
            let slug = alphanumeric(SLUG_LENGTH);
            if !repo.id_exists(&slug).await? {
                return Ok(slug);
            }
        }

        Err(InternalError::IdExhausted {
            kind: "image slug",
            attempts: MAX_SLUG_ATTEMPTS,
        }
        .into())
    }
}

/// Keeps only the last path segment of a client supplied file name.
fn clean_file_name(name: Option<&str>, extension: &str) -> String {
    let name = name
        .and_then(|n| n.rsplit(|c| c == '/' || c == '\\').next())
        .map(str::trim)
        .filter(|n| !n.is_empty());

    match name {
        Some(name) => name.chars().take(MAX_NAME_LENGTH).collect(),
        None => format!("upload.{}", extension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{data::log::LogRepository, service::storage::MemoryStore};
    use sea_orm::DbErr;
    use test_utils::{builder::TestBuilder, factory};

    fn png(len: usize) -> UploadParam {
        UploadParam {
            file_name: Some("holiday/cat.png".to_string()),
            content_type: "image/png".to_string(),
            bytes: Bytes::from(vec![7u8; len]),
        }
    }

    async fn verified_user(db: &DatabaseConnection, upload_limit: i64) -> Result<User, DbErr> {
        let model = factory::user::UserFactory::new(db)
            .email_verified(true)
            .upload_limit(upload_limit)
            .build()
            .await?;

        Ok(User::from_entity(model))
    }

    #[test]
    fn maps_content_types_to_extensions() {
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("IMAGE/JPEG"), Some("jpg"));
        assert_eq!(extension_for("image/svg+xml; charset=utf-8"), Some("svg"));
        assert_eq!(extension_for("application/pdf"), None);
        assert_eq!(extension_for(""), None);
    }

    #[test]
    fn cleans_file_names() {
        assert_eq!(clean_file_name(Some("a/b/c.png"), "png"), "c.png");
        assert_eq!(clean_file_name(Some("C:\\pics\\d.gif"), "gif"), "d.gif");
        assert_eq!(clean_file_name(Some("  "), "png"), "upload.png");
        assert_eq!(clean_file_name(None, "webp"), "upload.webp");
    }

    /// Tests a successful upload.
    ///
    /// Expected: row stored, bytes in the store, quota charged, UPLOAD log written
    #[tokio::test]
    async fn stores_upload_and_charges_quota() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = UploadService::new(db, &store, &settings);

        let user = verified_user(db, 1024).await?;
        let image = service.upload(&user, png(100)).await.unwrap();

        assert_eq!(image.id.len(), SLUG_LENGTH);
        assert_eq!(image.original_name, "cat.png");
        assert_eq!(image.size, 100);
        assert_eq!(image.storage_key, format!("{}/{}.png", user.id, image.id));
        assert!(store.contains(&image.storage_key));

        let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
        assert_eq!(stored.space_used, 100);

        let (logs, _) = LogRepository::new(db)
            .get_paginated(Some(LogKind::Upload), 0, 10)
            .await?;
        assert_eq!(logs.len(), 1);

        Ok(())
    }

    /// Tests that unverified users cannot upload.
    ///
    /// Expected: EmailNotVerified and nothing stored
    #[tokio::test]
    async fn rejects_unverified_user() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = UploadService::new(db, &store, &settings);

        let user = User::from_entity(factory::create_user(db).await?);
        let result = service.upload(&user, png(10)).await;

        assert!(matches!(
            result,
            Err(AppError::AuthErr(AuthError::EmailNotVerified(_)))
        ));
        assert_eq!(store.len(), 0);

        Ok(())
    }

    /// Tests MIME type rejection.
    ///
    /// Expected: BadRequest and quota untouched
    #[tokio::test]
    async fn rejects_unsupported_type() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = UploadService::new(db, &store, &settings);

        let user = verified_user(db, 1024).await?;
        let mut param = png(10);
        param.content_type = "application/x-msdownload".to_string();

        let result = service.upload(&user, param).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
        assert_eq!(stored.space_used, 0);

        Ok(())
    }

    /// Tests the per-file size limit.
    ///
    /// Expected: PayloadTooLarge
    #[tokio::test]
    async fn rejects_file_above_size_limit() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let mut settings = Settings::for_tests();
        settings.max_upload_size = 50;
        let service = UploadService::new(db, &store, &settings);

        let user = verified_user(db, 1024).await?;
        let result = service.upload(&user, png(51)).await;

        assert!(matches!(result, Err(AppError::PayloadTooLarge(_))));
        assert_eq!(store.len(), 0);

        Ok(())
    }

    /// Tests quota enforcement across uploads.
    ///
    /// Expected: upload filling the quota exactly succeeds, the next one fails
    #[tokio::test]
    async fn enforces_storage_quota() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = UploadService::new(db, &store, &settings);

        let user = verified_user(db, 150).await?;
        service.upload(&user, png(100)).await.unwrap();
        service.upload(&user, png(50)).await.unwrap();

        let result = service.upload(&user, png(1)).await;
        assert!(matches!(result, Err(AppError::PayloadTooLarge(_))));

        let stored = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
        assert_eq!(stored.space_used, 150);
        assert_eq!(store.len(), 2);

        Ok(())
    }

    /// Tests that an empty file is rejected.
    ///
    /// Expected: BadRequest
    #[tokio::test]
    async fn rejects_empty_file() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = UploadService::new(db, &store, &settings);

        let user = verified_user(db, 1024).await?;
        let result = service.upload(&user, png(0)).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));

        Ok(())
    }
}
