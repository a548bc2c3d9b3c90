use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};

use crate::server::model::notification::Notification;

pub struct NotificationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NotificationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: i32, message: String) -> Result<Notification, DbErr> {
        let entity = entity::notification::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            message: ActiveValue::Set(message),
            seen: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Notification::from_entity(entity))
    }

    /// All notifications of a user, newest first.
    pub async fn get_by_user(&self, user_id: i32) -> Result<Vec<Notification>, DbErr> {
        let entities = entity::prelude::Notification::find()
            .filter(entity::notification::Column::UserId.eq(user_id))
            .order_by_desc(entity::notification::Column::CreatedAt)
            .order_by_desc(entity::notification::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Notification::from_entity).collect())
    }

    /// Marks one notification seen, scoped to its owner.
    ///
    /// # Returns
    /// - `Ok(true)` - Notification belongs to the user and is now seen
    /// - `Ok(false)` - No such notification for this user
    pub async fn mark_seen(&self, user_id: i32, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Notification::update_many()
            .filter(entity::notification::Column::Id.eq(id))
            .filter(entity::notification::Column::UserId.eq(user_id))
            .col_expr(entity::notification::Column::Seen, Expr::value(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    pub async fn mark_all_seen(&self, user_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Notification::update_many()
            .filter(entity::notification::Column::UserId.eq(user_id))
            .filter(entity::notification::Column::Seen.eq(false))
            .col_expr(entity::notification::Column::Seen, Expr::value(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
