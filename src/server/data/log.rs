use chrono::Utc;
use entity::log::LogKind;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::log::Log;

pub struct LogRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LogRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        kind: LogKind,
        message: String,
        user_id: Option<i32>,
    ) -> Result<Log, DbErr> {
        let entity = entity::log::ActiveModel {
            kind: ActiveValue::Set(kind),
            message: ActiveValue::Set(message),
            user_id: ActiveValue::Set(user_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Log::from_entity(entity))
    }

    /// Gets log entries newest first, optionally restricted to one kind.
    pub async fn get_paginated(
        &self,
        kind: Option<LogKind>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Log>, u64), DbErr> {
        let mut query = entity::prelude::Log::find();
        if let Some(kind) = kind {
            query = query.filter(entity::log::Column::Kind.eq(kind));
        }

        let paginator = query
            .order_by_desc(entity::log::Column::CreatedAt)
            .order_by_desc(entity::log::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page).await?;

        Ok((entities.into_iter().map(Log::from_entity).collect(), total))
    }

    pub async fn clear(&self) -> Result<u64, DbErr> {
        let result = entity::prelude::Log::delete_many().exec(self.db).await?;

        Ok(result.rows_affected)
    }
}
