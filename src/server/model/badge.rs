use chrono::{DateTime, Utc};

use crate::model::user::BadgeDto;

/// Admin-granted label shown on a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Badge {
    pub fn into_dto(self) -> BadgeDto {
        BadgeDto {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
        }
    }

    pub fn from_entity(entity: entity::badge::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            name: entity.name,
            created_at: entity.created_at,
        }
    }
}
