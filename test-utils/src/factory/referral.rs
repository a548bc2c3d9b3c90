//! Referral factory recording a consumed referral code.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Records that `referred_id` registered with `referrer_id`'s code.
pub async fn create_referral(
    db: &DatabaseConnection,
    referrer_id: i32,
    referred_id: i32,
) -> Result<entity::referral::Model, DbErr> {
    entity::referral::ActiveModel {
        referrer_id: ActiveValue::Set(referrer_id),
        referred_id: ActiveValue::Set(referred_id),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
