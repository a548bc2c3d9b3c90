use chrono::{DateTime, Utc};

use crate::model::user::{ReferralsDto, ReferredUserDto};

/// Account registered with someone's referral code.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferredUser {
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

/// A user's referral code together with who used it.
#[derive(Debug, Clone, PartialEq)]
pub struct Referrals {
    pub code: String,
    pub limit: i32,
    pub referred: Vec<ReferredUser>,
}

impl Referrals {
    pub fn remaining(&self) -> i32 {
        (self.limit - self.referred.len() as i32).max(0)
    }

    pub fn into_dto(self) -> ReferralsDto {
        let remaining = self.remaining();

        ReferralsDto {
            code: self.code,
            limit: self.limit,
            remaining,
            referred: self
                .referred
                .into_iter()
                .map(|r| ReferredUserDto {
                    username: r.username,
                    joined_at: r.joined_at,
                })
                .collect(),
        }
    }
}
