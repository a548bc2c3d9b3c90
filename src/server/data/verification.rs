//! Verification code repository.

use chrono::{DateTime, Utc};
use entity::verification::VerificationKind;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

use crate::server::model::verification::Verification;

pub struct VerificationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VerificationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a new code, deleting older codes of the same kind for the user first.
    pub async fn replace(
        &self,
        user_id: i32,
        kind: VerificationKind,
        code: String,
        expires_at: DateTime<Utc>,
    ) -> Result<Verification, DbErr> {
        self.delete_for_user(user_id, kind).await?;

        let entity = entity::verification::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            kind: ActiveValue::Set(kind),
            code: ActiveValue::Set(code),
            expires_at: ActiveValue::Set(expires_at),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Verification::from_entity(entity))
    }

    pub async fn find_by_code(
        &self,
        kind: VerificationKind,
        code: &str,
    ) -> Result<Option<Verification>, DbErr> {
        let entity = entity::prelude::Verification::find()
            .filter(entity::verification::Column::Kind.eq(kind))
            .filter(entity::verification::Column::Code.eq(code))
            .one(self.db)
            .await?;

        Ok(entity.map(Verification::from_entity))
    }

    pub async fn code_exists(&self, code: &str) -> Result<bool, DbErr> {
        let entity = entity::prelude::Verification::find()
            .filter(entity::verification::Column::Code.eq(code))
            .one(self.db)
            .await?;

        Ok(entity.is_some())
    }

    /// Removes a code before it is acted on, making it single-use under concurrency.
    ///
    /// # Returns
    /// - `Ok(true)` - This caller consumed the code
    /// - `Ok(false)` - The code was already consumed or replaced
    pub async fn claim(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Verification::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    pub async fn delete_for_user(&self, user_id: i32, kind: VerificationKind) -> Result<(), DbErr> {
        entity::prelude::Verification::delete_many()
            .filter(entity::verification::Column::UserId.eq(user_id))
            .filter(entity::verification::Column::Kind.eq(kind))
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Deletes every code that expired before `now`.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::Verification::delete_many()
            .filter(entity::verification::Column::ExpiresAt.lte(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
