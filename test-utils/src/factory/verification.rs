//! Verification factory for email and password reset codes.

use chrono::{Duration, Utc};
use entity::verification::VerificationKind;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Inserts a verification code expiring `ttl_minutes` from now.
///
/// A negative TTL produces an already expired code.
pub async fn create_verification(
    db: &DatabaseConnection,
    user_id: i32,
    kind: VerificationKind,
    code: &str,
    ttl_minutes: i64,
) -> Result<entity::verification::Model, DbErr> {
    let now = Utc::now();
    entity::verification::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        kind: ActiveValue::Set(kind),
        code: ActiveValue::Set(code.to_string()),
        expires_at: ActiveValue::Set(now + Duration::minutes(ttl_minutes)),
        created_at: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}
