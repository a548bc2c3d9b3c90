use sea_orm::DatabaseConnection;

use crate::server::{
    data::notification::NotificationRepository, error::AppError,
    model::notification::Notification,
};

pub struct NotificationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NotificationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn send(&self, user_id: i32, message: String) -> Result<Notification, AppError> {
        let message = message.trim().to_string();
        if message.is_empty() {
            return Err(AppError::BadRequest(
                "Notification message cannot be empty".to_string(),
            ));
        }

        let notification = NotificationRepository::new(self.db)
            .create(user_id, message)
            .await?;

        Ok(notification)
    }

    /// The user's notifications, newest first.
    pub async fn list(&self, user_id: i32) -> Result<Vec<Notification>, AppError> {
        let notifications = NotificationRepository::new(self.db)
            .get_by_user(user_id)
            .await?;

        Ok(notifications)
    }

    /// Marks one of the user's notifications as seen.
    ///
    /// # Returns
    /// - `Err(AppError::NotFound)` - No such notification for this user
    pub async fn mark_seen(&self, user_id: i32, id: i32) -> Result<(), AppError> {
        if !NotificationRepository::new(self.db)
            .mark_seen(user_id, id)
            .await?
        {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }

        Ok(())
    }

    pub async fn mark_all_seen(&self, user_id: i32) -> Result<u64, AppError> {
        let updated = NotificationRepository::new(self.db)
            .mark_all_seen(user_id)
            .await?;

        Ok(updated)
    }
}
