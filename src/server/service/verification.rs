//! Email verification and password reset flows.
//!
//! Both flows store a single-use code in the `verification` table. Issuing a new code
//! replaces any older code of the same kind for that user, and expired codes are
//! purged by the scheduler.

use chrono::{Duration, Utc};
use entity::{log::LogKind, verification::VerificationKind};
use sea_orm::DatabaseConnection;

use crate::server::{
    config::Settings,
    data::{user::UserRepository, verification::VerificationRepository},
    error::{auth::AuthError, internal::InternalError, AppError},
    model::{user::User, verification::Verification},
    service::{
        email::{password_reset_email, verification_email, Mailer},
        log::LogService,
    },
    util::{
        password::hash_password,
        random::{alphanumeric, digits},
        validate,
    },
};

pub const EMAIL_CODE_TTL_MINUTES: i64 = 30;
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

const EMAIL_CODE_LENGTH: usize = 6;
const RESET_TOKEN_LENGTH: usize = 48;
const MAX_CODE_ATTEMPTS: usize = 10;

pub struct VerificationService<'a> {
    db: &'a DatabaseConnection,
    mailer: &'a dyn Mailer,
    settings: &'a Settings,
}

impl<'a> VerificationService<'a> {
    pub fn new(db: &'a DatabaseConnection, mailer: &'a dyn Mailer, settings: &'a Settings) -> Self {
        Self {
            db,
            mailer,
            settings,
        }
    }

    /// Issues a fresh 6-digit email code and mails it to the user.
    ///
    /// # Returns
    /// - `Ok(())` - Code stored and handed to the mailer
    /// - `Err(AppError::ProviderErr)` - The email provider rejected the message
    pub async fn send_email_code(&self, user: &User) -> Result<(), AppError> {
        let code = self.unique_code(|| digits(EMAIL_CODE_LENGTH)).await?;

        VerificationRepository::new(self.db)
            .replace(
                user.id,
                VerificationKind::Email,
                code.clone(),
                Utc::now() + Duration::minutes(EMAIL_CODE_TTL_MINUTES),
            )
            .await?;

        self.mailer
            .send(verification_email(
                &user.email,
                &user.username,
                &code,
                EMAIL_CODE_TTL_MINUTES,
            ))
            .await
    }

    /// Marks the user's email as verified when `code` is their current, unexpired code.
    ///
    /// # Returns
    /// - `Ok(())` - Email verified, code consumed
    /// - `Err(AppError::BadRequest)` - Email was already verified
    /// - `Err(AuthError::InvalidVerificationCode)` - Unknown, foreign or expired code
    pub async fn verify_email(&self, user: &User, code: &str) -> Result<(), AppError> {
        if user.email_verified {
            return Err(AppError::BadRequest("Email is already verified".to_string()));
        }

        let verification = self
            .find_valid(VerificationKind::Email, code)
            .await?
            .filter(|v| v.user_id == user.id)
            .ok_or(AuthError::InvalidVerificationCode)?;

        if !VerificationRepository::new(self.db)
            .claim(verification.id)
            .await?
        {
            return Err(AuthError::InvalidVerificationCode.into());
        }

        UserRepository::new(self.db)
            .set_email_verified(user.id)
            .await?;

        LogService::new(self.db)
            .record(
                LogKind::Auth,
                format!("{} verified their email", user.username),
                Some(user.id),
            )
            .await;

        Ok(())
    }

    pub async fn resend_email_code(&self, user: &User) -> Result<(), AppError> {
        if user.email_verified {
            return Err(AppError::BadRequest("Email is already verified".to_string()));
        }

        self.send_email_code(user).await
    }

    /// Mails a password reset link if an account with this email exists.
    ///
    /// Unknown or deleted accounts and mail failures are only logged, so the caller
    /// cannot tell whether the address is registered.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let email = email.trim().to_lowercase();

        let Some(user) = UserRepository::new(self.db).find_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown email {}", email);
            return Ok(());
        };
        if user.is_deleted() {
            tracing::debug!("Password reset requested for deleted user {}", user.id);
            return Ok(());
        }

        let token = self.unique_code(|| alphanumeric(RESET_TOKEN_LENGTH)).await?;
        VerificationRepository::new(self.db)
            .replace(
                user.id,
                VerificationKind::PasswordReset,
                token.clone(),
                Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
            )
            .await?;

        let link = format!("{}/reset-password?token={}", self.settings.app_url, token);
        let message =
            password_reset_email(&user.email, &user.username, &link, RESET_TOKEN_TTL_MINUTES);

        if let Err(e) = self.mailer.send(message).await {
            tracing::error!("Failed to send password reset email to user {}: {}", user.id, e);
        }

        Ok(())
    }

    /// Sets a new password using a reset token.
    ///
    /// # Returns
    /// - `Ok(())` - Password updated, token consumed
    /// - `Err(AppError::ValidationErr)` - New password rejected
    /// - `Err(AuthError::InvalidVerificationCode)` - Unknown or expired token
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), AppError> {
        validate::password("password", password)?;

        let verification = self
            .find_valid(VerificationKind::PasswordReset, token)
            .await?
            .ok_or(AuthError::InvalidVerificationCode)?;

        if !VerificationRepository::new(self.db)
            .claim(verification.id)
            .await?
        {
            return Err(AuthError::InvalidVerificationCode.into());
        }

        let password_hash = hash_password(password)?;
        UserRepository::new(self.db)
            .update_password(verification.user_id, password_hash)
            .await?;

        LogService::new(self.db)
            .record(
                LogKind::Auth,
                "Password reset completed",
                Some(verification.user_id),
            )
            .await;

        Ok(())
    }

    async fn find_valid(
        &self,
        kind: VerificationKind,
        code: &str,
    ) -> Result<Option<Verification>, AppError> {
        let verification = VerificationRepository::new(self.db)
            .find_by_code(kind, code.trim())
            .await?;

        Ok(verification.filter(|v| !v.is_expired(Utc::now())))
    }

    async fn unique_code(&self, generate: impl Fn() -> String) -> Result<String, AppError> {
        let repo = VerificationRepository::new(self.db);

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate();
            if !repo.code_exists(&code).await? {
                return Ok(code);
            }
        }

        Err(InternalError::IdExhausted {
            kind: "verification code",
            attempts: MAX_CODE_ATTEMPTS,
        }
        .into())
    }
}
