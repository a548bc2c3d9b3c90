use chrono::{DateTime, Utc};
use entity::trigger::TriggerKind;

/// Deferred job persisted in the trigger queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub id: i32,
    pub kind: TriggerKind,
    /// Domain ID for `DomainCheck`, user ID for `PurgeUserImages`.
    pub target_id: i32,
    /// How many times the job has already run.
    pub attempts: i32,
    pub run_after: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Trigger {
    pub fn from_entity(entity: entity::trigger::Model) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            target_id: entity.target_id,
            attempts: entity.attempts,
            run_after: entity.run_after,
            created_at: entity.created_at,
        }
    }
}
