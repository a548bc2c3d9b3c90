use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::badge::Badge;

pub struct BadgeRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> BadgeRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: i32, name: String) -> Result<Badge, DbErr> {
        let entity = entity::badge::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(name),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Badge::from_entity(entity))
    }

    pub async fn get_by_user(&self, user_id: i32) -> Result<Vec<Badge>, DbErr> {
        let entities = entity::prelude::Badge::find()
            .filter(entity::badge::Column::UserId.eq(user_id))
            .order_by_asc(entity::badge::Column::CreatedAt)
            .order_by_asc(entity::badge::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Badge::from_entity).collect())
    }

    pub async fn has_badge(&self, user_id: i32, name: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::Badge::find()
            .filter(entity::badge::Column::UserId.eq(user_id))
            .filter(entity::badge::Column::Name.eq(name))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Deletes a badge of the given user.
    ///
    /// # Returns
    /// - `Ok(true)` - Badge removed
    /// - `Ok(false)` - The user has no badge with that ID
    pub async fn delete(&self, user_id: i32, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Badge::delete_many()
            .filter(entity::badge::Column::Id.eq(id))
            .filter(entity::badge::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
