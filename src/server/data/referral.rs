use chrono::Utc;
use std::collections::HashMap;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::referral::ReferredUser;

pub struct ReferralRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ReferralRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Records that `referred_id` registered with `referrer_id`'s code.
    pub async fn create(&self, referrer_id: i32, referred_id: i32) -> Result<(), DbErr> {
        entity::referral::ActiveModel {
            referrer_id: ActiveValue::Set(referrer_id),
            referred_id: ActiveValue::Set(referred_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;
        Ok(())
    }

    /// Number of registrations made with the referrer's code.
    pub async fn count_by_referrer(&self, referrer_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Referral::find()
            .filter(entity::referral::Column::ReferrerId.eq(referrer_id))
            .count(self.db)
            .await
    }

    /// Users who registered with the referrer's code, oldest first.
    pub async fn get_referred(&self, referrer_id: i32) -> Result<Vec<ReferredUser>, DbErr> {
        let referrals = entity::prelude::Referral::find()
            .filter(entity::referral::Column::ReferrerId.eq(referrer_id))
            .order_by_asc(entity::referral::Column::CreatedAt)
            .order_by_asc(entity::referral::Column::Id)
            .all(self.db)
            .await?;

        let ids: Vec<i32> = referrals.iter().map(|r| r.referred_id).collect();
        let users: HashMap<i32, String> = entity::prelude::User::find()
            .filter(entity::user::Column::Id.is_in(ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(referrals
            .into_iter()
            .filter_map(|referral| {
                users.get(&referral.referred_id).map(|username| ReferredUser {
                    username: username.clone(),
                    joined_at: referral.created_at,
                })
            })
            .collect())
    }
}
