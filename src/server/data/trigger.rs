//! Persisted job queue consumed by the scheduler.

use chrono::{DateTime, Utc};
use entity::trigger::TriggerKind;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::trigger::Trigger;

pub struct TriggerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TriggerRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enqueues a job to run at or after `run_after`.
    pub async fn enqueue(
        &self,
        kind: TriggerKind,
        target_id: i32,
        attempts: i32,
        run_after: DateTime<Utc>,
    ) -> Result<Trigger, DbErr> {
        let entity = entity::trigger::ActiveModel {
            kind: ActiveValue::Set(kind),
            target_id: ActiveValue::Set(target_id),
            attempts: ActiveValue::Set(attempts),
            run_after: ActiveValue::Set(run_after),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Trigger::from_entity(entity))
    }

    /// Jobs whose `run_after` has passed, oldest first.
    pub async fn get_due(&self, now: DateTime<Utc>, limit: u64) -> Result<Vec<Trigger>, DbErr> {
        let entities = entity::prelude::Trigger::find()
            .filter(entity::trigger::Column::RunAfter.lte(now))
            .order_by_asc(entity::trigger::Column::RunAfter)
            .order_by_asc(entity::trigger::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Trigger::from_entity).collect())
    }

    /// Removes a job before running it so a crash never runs it twice.
    ///
    /// # Returns
    /// - `Ok(true)` - This caller claimed the job
    /// - `Ok(false)` - Another worker already removed it
    pub async fn claim(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Trigger::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    #[cfg(test)]
    pub async fn get_all(&self) -> Result<Vec<Trigger>, DbErr> {
        let entities = entity::prelude::Trigger::find()
            .order_by_asc(entity::trigger::Column::RunAfter)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Trigger::from_entity).collect())
    }
}
