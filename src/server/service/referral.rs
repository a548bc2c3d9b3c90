use sea_orm::DatabaseConnection;

use crate::server::{
    data::referral::ReferralRepository,
    error::AppError,
    model::{referral::Referrals, user::User},
};

pub struct ReferralService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReferralService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// The user's referral code, its limit and everyone who registered with it.
    pub async fn get(&self, user: &User) -> Result<Referrals, AppError> {
        let referred = ReferralRepository::new(self.db)
            .get_referred(user.id)
            .await?;

        Ok(Referrals {
            code: user.referral_code.clone(),
            limit: user.referral_limit,
            referred,
        })
    }
}
