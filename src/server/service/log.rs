//! Audit log service.

use entity::log::LogKind;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::log::LogRepository,
    error::AppError,
    model::{
        log::Log,
        pagination::{clamp_per_page, Paginated},
    },
};

pub struct LogService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LogService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an audit entry.
    ///
    /// Audit logging never fails the surrounding operation; write errors are only
    /// reported through tracing.
    pub async fn record(&self, kind: LogKind, message: impl Into<String>, user_id: Option<i32>) {
        let message = message.into();

        if let Err(e) = LogRepository::new(self.db)
            .create(kind, message.clone(), user_id)
            .await
        {
            tracing::warn!("Failed to write {:?} log entry '{}': {}", kind, message, e);
        }
    }

    pub async fn get_paginated(
        &self,
        kind: Option<LogKind>,
        page: u64,
        per_page: u64,
    ) -> Result<Paginated<Log>, AppError> {
        let per_page = clamp_per_page(per_page);
        let (logs, total) = LogRepository::new(self.db)
            .get_paginated(kind, page, per_page)
            .await?;

        Ok(Paginated::new(logs, total, page, per_page))
    }

    pub async fn clear(&self) -> Result<u64, AppError> {
        let removed = LogRepository::new(self.db).clear().await?;
        Ok(removed)
    }
}
