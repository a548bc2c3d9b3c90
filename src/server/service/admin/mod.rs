//! Back-office operations available to admins.
//!
//! Callers are expected to have passed the admin permission check already; the
//! service only enforces rules that depend on the data, such as an admin not being
//! able to delete their own account.

pub mod code;

use chrono::Utc;
use entity::{log::LogKind, trigger::TriggerKind};
use sea_orm::DatabaseConnection;

use crate::server::{
    config::Settings,
    data::{
        badge::BadgeRepository, image::ImageRepository, trigger::TriggerRepository,
        user::UserRepository,
    },
    error::{validation::ValidationError, AppError},
    model::{
        badge::Badge,
        domain::Domain,
        image::ImageWithUploader,
        log::Log,
        notification::Notification,
        pagination::{clamp_per_page, Paginated},
        stats::Stats,
        user::{UpdateUserParam, User, UserWithBadges},
    },
    service::{
        domain::DomainService, image::ImageService, log::LogService,
        notification::NotificationService, storage::ObjectStore, user::UserService,
    },
};

/// Longest badge name accepted.
pub const BADGE_NAME_MAX: usize = 32;

pub struct AdminService<'a> {
    db: &'a DatabaseConnection,
    storage: &'a dyn ObjectStore,
    settings: &'a Settings,
}

impl<'a> AdminService<'a> {
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

    /// Lists every account, deleted ones included, newest first.
    ///
    /// # Arguments
    /// - `search` - Optional substring matched against username and email
    pub async fn list_users(
        &self,
        page: u64,
        per_page: u64,
        search: Option<&str>,
    ) -> Result<Paginated<UserWithBadges>, AppError> {
        let per_page = clamp_per_page(per_page);
        let (users, total) = UserRepository::new(self.db)
            .get_all_paginated(page, per_page, search)
            .await?;

        let badge_repo = BadgeRepository::new(self.db);
        let mut items = Vec::with_capacity(users.len());
        for user in users {
            let badges = badge_repo.get_by_user(user.id).await?;
            items.push(UserWithBadges { user, badges });
        }

        Ok(Paginated::new(items, total, page, per_page))
    }

    /// Changes the admin flag and limits of an account.
    ///
    /// # Returns
    /// - `Ok(UserWithBadges)` - Updated account
    /// - `Err(AppError::ValidationErr)` - Negative limit
    /// - `Err(AppError::BadRequest)` - Admin removing their own admin flag
    /// - `Err(AppError::NotFound)` - No such user
    pub async fn update_user(
        &self,
        actor: &User,
        id: i32,
        param: UpdateUserParam,
    ) -> Result<UserWithBadges, AppError> {
        if param.upload_limit.is_some_and(|l| l < 0) {
            return Err(
                ValidationError::new("upload_limit", "Upload limit cannot be negative").into(),
            );
        }
        if param.referral_limit.is_some_and(|l| l < 0) {
            return Err(
                ValidationError::new("referral_limit", "Referral limit cannot be negative").into(),
            );
        }
        if actor.id == id && param.admin == Some(false) {
            return Err(AppError::BadRequest(
                "You cannot remove your own admin rights".to_string(),
            ));
        }

        let user = UserRepository::new(self.db)
            .update_admin_fields(id, param)
            .await?
            .ok_or_else(user_not_found)?;

        LogService::new(self.db)
            .record(
                LogKind::Admin,
                format!("{} updated user {}", actor.username, user.username),
                Some(actor.id),
            )
            .await;

        UserService::new(self.db).profile(user).await
    }

    /// Soft-deletes an account and queues removal of its images.
    ///
    /// The account row stays so it can be restored; the images are purged by the
    /// scheduler on its next run.
    pub async fn delete_user(&self, actor: &User, id: i32) -> Result<(), AppError> {
        if actor.id == id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }

        let user_repo = UserRepository::new(self.db);
        let user = user_repo.find_by_id(id).await?.ok_or_else(user_not_found)?;
        if user.is_deleted() {
            return Err(AppError::BadRequest("User is already deleted".to_string()));
        }

        user_repo.soft_delete(id).await?;
        TriggerRepository::new(self.db)
            .enqueue(TriggerKind::PurgeUserImages, id, 0, Utc::now())
            .await?;

        LogService::new(self.db)
            .record(
                LogKind::Admin,
                format!("{} deleted user {}", actor.username, user.username),
                Some(actor.id),
            )
            .await;

        Ok(())
    }

    /// Lifts a soft delete. Images already purged are not brought back.
    pub async fn restore_user(&self, actor: &User, id: i32) -> Result<(), AppError> {
        let user_repo = UserRepository::new(self.db);
        let user = user_repo.find_by_id(id).await?.ok_or_else(user_not_found)?;
        if !user.is_deleted() {
            return Err(AppError::BadRequest("User is not deleted".to_string()));
        }

        user_repo.restore(id).await?;

        LogService::new(self.db)
            .record(
                LogKind::Admin,
                format!("{} restored user {}", actor.username, user.username),
                Some(actor.id),
            )
            .await;

        Ok(())
    }

    /// Grants a named badge.
    ///
    /// # Returns
    /// - `Err(AppError::ValidationErr)` - Empty or overlong name
    /// - `Err(AppError::Conflict)` - The user already has that badge
    /// - `Err(AppError::NotFound)` - No such user
    pub async fn grant_badge(
        &self,
        actor: &User,
        user_id: i32,
        name: &str,
    ) -> Result<Badge, AppError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > BADGE_NAME_MAX {
            return Err(ValidationError::new(
                "name",
                format!("Badge name must be 1 to {} characters", BADGE_NAME_MAX),
            )
            .into());
        }

        let user = UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)?;

        let badge_repo = BadgeRepository::new(self.db);
        if badge_repo.has_badge(user.id, name).await? {
            return Err(AppError::Conflict(format!(
                "{} already has the {} badge",
                user.username, name
            )));
        }

        let badge = badge_repo.create(user.id, name.to_string()).await?;

        LogService::new(self.db)
            .record(
                LogKind::Admin,
                format!("{} granted badge {} to {}", actor.username, name, user.username),
                Some(actor.id),
            )
            .await;

        Ok(badge)
    }

    pub async fn revoke_badge(
        &self,
        actor: &User,
        user_id: i32,
        badge_id: i32,
    ) -> Result<(), AppError> {
        if !BadgeRepository::new(self.db)
            .delete(user_id, badge_id)
            .await?
        {
            return Err(AppError::NotFound("Badge not found".to_string()));
        }

        LogService::new(self.db)
            .record(
                LogKind::Admin,
                format!(
                    "{} revoked badge {} of user {}",
                    actor.username, badge_id, user_id
                ),
                Some(actor.id),
            )
            .await;

        Ok(())
    }

    pub async fn notify(&self, user_id: i32, message: String) -> Result<Notification, AppError> {
        UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)?;

        NotificationService::new(self.db).send(user_id, message).await
    }

    pub async fn list_images(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<Paginated<ImageWithUploader>, AppError> {
        let per_page = clamp_per_page(per_page);
        let (images, total) = ImageRepository::new(self.db)
            .get_all_paginated(page, per_page)
            .await?;

        Ok(Paginated::new(images, total, page, per_page))
    }

    pub async fn delete_image(&self, actor: &User, id: &str) -> Result<(), AppError> {
        ImageService::new(self.db, self.storage, self.settings)
            .delete(actor, id)
            .await
    }

    pub async fn list_domains(&self) -> Result<Vec<Domain>, AppError> {
        self.domains().list_all().await
    }

    pub async fn set_domain_public(
        &self,
        actor: &User,
        id: i32,
        public: bool,
    ) -> Result<Domain, AppError> {
        self.domains().set_public(actor, id, public).await
    }

    pub async fn delete_domain(&self, actor: &User, id: i32) -> Result<(), AppError> {
        self.domains().delete(actor, id).await
    }

    pub async fn list_logs(
        &self,
        kind: Option<LogKind>,
        page: u64,
        per_page: u64,
    ) -> Result<Paginated<Log>, AppError> {
        LogService::new(self.db)
            .get_paginated(kind, page, per_page)
            .await
    }

    pub async fn clear_logs(&self, actor: &User) -> Result<u64, AppError> {
        let removed = LogService::new(self.db).clear().await?;
        tracing::info!("{} cleared {} log entries", actor.username, removed);

        Ok(removed)
    }

    pub async fn stats(&self) -> Result<Stats, AppError> {
        let image_repo = ImageRepository::new(self.db);

        Ok(Stats {
            users: UserRepository::new(self.db).count_live().await?,
            images: image_repo.count_live().await?,
            storage_used: image_repo.total_size().await?,
        })
    }

    fn domains(&self) -> DomainService<'a> {
        DomainService::new(self.db, None, self.settings)
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}
