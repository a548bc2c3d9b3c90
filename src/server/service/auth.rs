//! Registration, login and password changes.
//!
//! Registration is invite-only: a new account needs either the referral code of a live
//! user with referrals left, or the one-time setup code that is printed at startup
//! while no admin exists. The setup code turns the new account into an admin.

use entity::log::LogKind;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    config::Settings,
    data::{referral::ReferralRepository, user::UserRepository},
    error::{auth::AuthError, AppError},
    model::user::{CreateUserParam, RegisterParam, User},
    service::{
        admin::code::SetupCodeService, email::Mailer, log::LogService,
        verification::VerificationService,
    },
    util::{
        password::{hash_password, verify_dummy, verify_password},
        random::alphanumeric,
        validate,
    },
};

/// Length of generated upload keys.
pub const UPLOAD_KEY_LENGTH: usize = 32;

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    mailer: &'a dyn Mailer,
    setup_code: &'a SetupCodeService,
    settings: &'a Settings,
}

/// Who vouched for a new account.
enum Invitation {
    Referral(User),
    SetupCode,
}

impl<'a> AuthService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        mailer: &'a dyn Mailer,
        setup_code: &'a SetupCodeService,
        settings: &'a Settings,
    ) -> Self {
        Self {
            db,
            mailer,
            setup_code,
            settings,
        }
    }

    /// Creates a new account.
    ///
    /// Validates the input, checks that username and email are free, resolves the
    /// invitation, stores the user with a fresh upload key and referral code, records
    /// the referral and mails an email verification code. A failing mail provider does
    /// not fail the registration; the user can request a new code later.
    ///
    /// # Returns
    /// - `Ok(User)` - The created account
    /// - `Err(AppError::ValidationErr)` - Username, email or password rejected
    /// - `Err(AppError::Conflict)` - Username or email already registered
    /// - `Err(AuthError::InvalidReferral)` - Unknown code or referrer deleted
    /// - `Err(AuthError::ReferralLimitReached)` - Referrer has no referrals left
    pub async fn register(&self, param: RegisterParam) -> Result<User, AppError> {
        validate::username(&param.username)?;
        validate::email(&param.email)?;
        validate::password("password", &param.password)?;

        let user_repo = UserRepository::new(self.db);

        if user_repo.username_exists(&param.username).await? {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }
        if user_repo.email_exists(&param.email).await? {
            return Err(AppError::Conflict(
                "Email address is already registered".to_string(),
            ));
        }

        let invitation = self.resolve_invitation(&param.referral_code).await?;
        let admin = matches!(invitation, Invitation::SetupCode);
        let password_hash = hash_password(&param.password)?;

        // The referral row and the limit re-check live in the user's transaction; a
        // referrer's last slot goes to exactly one registration.
        let txn = self.db.begin().await?;

        let user = UserRepository::new(&txn)
            .create(CreateUserParam {
                username: param.username,
                email: param.email,
                password_hash,
                upload_key: alphanumeric(UPLOAD_KEY_LENGTH),
                referral_code: uuid::Uuid::new_v4().to_string(),
                referral_limit: self.settings.default_referral_limit,
                upload_limit: self.settings.default_upload_limit as i64,
                admin,
            })
            .await?;

        if let Invitation::Referral(referrer) = &invitation {
            let referrals = ReferralRepository::new(&txn);
            referrals.create(referrer.id, user.id).await?;

            if referrals.count_by_referrer(referrer.id).await? > referrer.referral_limit.max(0) as u64
            {
                txn.rollback().await?;
                return Err(AuthError::ReferralLimitReached.into());
            }
        }

        if admin && !self.setup_code.validate_and_consume(&param.referral_code).await {
            txn.rollback().await?;
            return Err(AuthError::InvalidReferral.into());
        }

        if let Err(e) = txn.commit().await {
            if admin {
                self.setup_code.restore(&param.referral_code).await;
            }
            return Err(e.into());
        }

        let log_service = LogService::new(self.db);
        match &invitation {
            Invitation::Referral(referrer) => {
                log_service
                    .record(
                        LogKind::Auth,
                        format!("{} registered, referred by {}", user.username, referrer.username),
                        Some(user.id),
                    )
                    .await;
            }
            Invitation::SetupCode => {
                tracing::info!("User {} registered as admin with the setup code", user.id);
                log_service
                    .record(
                        LogKind::Admin,
                        format!("{} registered as admin using the setup code", user.username),
                        Some(user.id),
                    )
                    .await;
            }
        }

        if let Err(e) = VerificationService::new(self.db, self.mailer, self.settings)
            .send_email_code(&user)
            .await
        {
            tracing::error!("Failed to send verification email to user {}: {}", user.id, e);
        }

        Ok(user)
    }

    /// Checks a username or email and password.
    ///
    /// Unknown logins and wrong passwords produce the same error.
    pub async fn login(&self, login: &str, password: &str) -> Result<User, AppError> {
        let user = UserRepository::new(self.db)
            .find_by_login(login.trim())
            .await?;
        let Some(user) = user else {
            verify_dummy(password);
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }
        if user.is_deleted() {
            return Err(AuthError::AccountDeleted(user.id).into());
        }

        LogService::new(self.db)
            .record(
                LogKind::Auth,
                format!("{} logged in", user.username),
                Some(user.id),
            )
            .await;

        Ok(user)
    }

    /// Replaces the password after checking the current one.
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !verify_password(current_password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }
        validate::password("new_password", new_password)?;

        UserRepository::new(self.db)
            .update_password(user.id, hash_password(new_password)?)
            .await?;

        LogService::new(self.db)
            .record(
                LogKind::Auth,
                format!("{} changed their password", user.username),
                Some(user.id),
            )
            .await;

        Ok(())
    }

    async fn resolve_invitation(&self, code: &str) -> Result<Invitation, AppError> {
        if let Some(referrer) = UserRepository::new(self.db)
            .find_by_referral_code(code)
            .await?
        {
            if referrer.is_deleted() {
                return Err(AuthError::InvalidReferral.into());
            }

            let used = ReferralRepository::new(self.db)
                .count_by_referrer(referrer.id)
                .await?;
            if used >= referrer.referral_limit.max(0) as u64 {
                return Err(AuthError::ReferralLimitReached.into());
            }

            return Ok(Invitation::Referral(referrer));
        }

        // Only peeked here; the code is consumed once the admin row is written.
        if !code.is_empty() && self.setup_code.matches(code).await {
            return Ok(Invitation::SetupCode);
        }

        Err(AuthError::InvalidReferral.into())
    }
}
