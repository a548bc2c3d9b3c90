use sea_orm::DatabaseConnection;
use tower_sessions::Session;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    middleware::session::AuthSession,
    model::user::User,
};

pub enum Permission {
    Admin,
    VerifiedEmail,
}

/// Resolves the caller of a request to a live user and checks their permissions.
pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, session: &'a Session) -> Self {
        Self { db, session }
    }

    /// Loads the session user and checks every permission in order.
    ///
    /// # Returns
    /// - `Ok(User)` - Logged in, not deleted and holding all permissions
    /// - `Err(AuthError::UserNotInSession)` - Nobody is logged in
    /// - `Err(AuthError::UserNotInDatabase)` - Session points at a removed user
    /// - `Err(AuthError::AccountDeleted)` - Account was soft-deleted after login
    /// - `Err(AuthError::AccessDenied)` / `Err(AuthError::EmailNotVerified)` - Missing permission
    pub async fn require(&self, permissions: &[Permission]) -> Result<User, AppError> {
        let Some(user_id) = AuthSession::new(self.session).get_user_id().await? else {
            return Err(AuthError::UserNotInSession.into());
        };

        let Some(user) = UserRepository::new(self.db).find_by_id(user_id).await? else {
            return Err(AuthError::UserNotInDatabase(user_id).into());
        };

        if user.is_deleted() {
            return Err(AuthError::AccountDeleted(user.id).into());
        }

        for permission in permissions {
            match permission {
                Permission::Admin => {
                    if !user.admin {
                        return Err(AuthError::AccessDenied(
                            user.id,
                            "User attempted an admin action without admin permissions"
                                .to_string(),
                        )
                        .into());
                    }
                }
                Permission::VerifiedEmail => {
                    if !user.email_verified {
                        return Err(AuthError::EmailNotVerified(user.id).into());
                    }
                }
            }
        }

        Ok(user)
    }

    /// Authenticates an upload either by upload key or by session.
    ///
    /// Upload clients send the key in the `Authorization` header, optionally with a
    /// `Bearer` prefix. Without a header the session user is used instead.
    pub async fn require_uploader(&self, authorization: Option<&str>) -> Result<User, AppError> {
        let Some(header) = authorization else {
            return self.require(&[]).await;
        };

        let key = header.strip_prefix("Bearer ").unwrap_or(header).trim();
        if key.is_empty() {
            return Err(AuthError::InvalidUploadKey.into());
        }

        let Some(user) = UserRepository::new(self.db).find_by_upload_key(key).await? else {
            return Err(AuthError::InvalidUploadKey.into());
        };

        if user.is_deleted() {
            return Err(AuthError::AccountDeleted(user.id).into());
        }

        Ok(user)
    }
}
