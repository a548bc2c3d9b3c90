//! Profile lookups for the logged-in user.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::badge::BadgeRepository,
    error::AppError,
    model::user::{User, UserWithBadges},
};

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attaches the user's badges for the profile response.
    pub async fn profile(&self, user: User) -> Result<UserWithBadges, AppError> {
        let badges = BadgeRepository::new(self.db).get_by_user(user.id).await?;

        Ok(UserWithBadges { user, badges })
    }
}
