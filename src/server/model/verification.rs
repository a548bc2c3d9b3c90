use chrono::{DateTime, Utc};
use entity::verification::VerificationKind;

/// Single-use email or password reset code.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub id: i32,
    pub user_id: i32,
    pub kind: VerificationKind,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Verification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn from_entity(entity: entity::verification::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            kind: entity.kind,
            code: entity.code,
            expires_at: entity.expires_at,
            created_at: entity.created_at,
        }
    }
}
