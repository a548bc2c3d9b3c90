use chrono::{DateTime, Utc};
use entity::log::LogKind;

use crate::{
    model::admin::{LogDto, LogKindDto, PaginatedLogsDto},
    server::model::pagination::Paginated,
};

/// Audit log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Log {
    pub id: i32,
    pub kind: LogKind,
    pub message: String,
    /// Acting user; cleared when the user row is removed.
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Log {
    pub fn into_dto(self) -> LogDto {
        LogDto {
            id: self.id,
            kind: self.kind.into(),
            message: self.message,
            user_id: self.user_id,
            created_at: self.created_at,
        }
    }

    pub fn from_entity(entity: entity::log::Model) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            message: entity.message,
            user_id: entity.user_id,
            created_at: entity.created_at,
        }
    }
}

impl Paginated<Log> {
    pub fn into_dto(self) -> PaginatedLogsDto {
        PaginatedLogsDto {
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
            logs: self.items.into_iter().map(Log::into_dto).collect(),
        }
    }
}

impl From<LogKind> for LogKindDto {
    fn from(value: LogKind) -> Self {
        match value {
            LogKind::Auth => Self::Auth,
            LogKind::Upload => Self::Upload,
            LogKind::Domain => Self::Domain,
            LogKind::Admin => Self::Admin,
        }
    }
}

impl From<LogKindDto> for LogKind {
    fn from(value: LogKindDto) -> Self {
        match value {
            LogKindDto::Auth => Self::Auth,
            LogKindDto::Upload => Self::Upload,
            LogKindDto::Domain => Self::Domain,
            LogKindDto::Admin => Self::Admin,
        }
    }
}
