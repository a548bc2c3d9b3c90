use chrono::{DateTime, Utc};

use crate::model::user::NotificationDto;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub message: String,
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn into_dto(self) -> NotificationDto {
        NotificationDto {
            id: self.id,
            message: self.message,
            seen: self.seen,
            created_at: self.created_at,
        }
    }

    pub fn from_entity(entity: entity::notification::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            message: entity.message,
            seen: entity.seen,
            created_at: entity.created_at,
        }
    }
}
