//! User factory for creating test user entities.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use entity::user::{Effect, UrlStyle};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let user = UserFactory::new(&db)
///     .username("alice")
///     .email_verified(true)
///     .upload_limit(1024)
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    username: String,
    email: String,
    password_hash: String,
    upload_key: String,
    referral_code: String,
    referral_limit: i32,
    upload_limit: i64,
    space_used: i64,
    admin: bool,
    email_verified: bool,
    domain_id: Option<i32>,
    subdomain: Option<String>,
    deleted_at: Option<DateTime<Utc>>,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - username: `"user{id}"`, email: `"user{id}@example.com"`
    /// - upload_key: `"key{id}"`, referral_code: random UUID
    /// - referral_limit: `3`, upload_limit: 100 MiB, space_used: `0`
    /// - admin and email_verified: `false`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            password_hash: "not-a-real-hash".to_string(),
            upload_key: format!("key{}", id),
            referral_code: uuid::Uuid::new_v4().to_string(),
            referral_limit: 3,
            upload_limit: 100 * 1024 * 1024,
            space_used: 0,
            admin: false,
            email_verified: false,
            domain_id: None,
            subdomain: None,
            deleted_at: None,
        }
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the stored password hash; tests hashing real passwords pass the output
    /// of the server's hasher here.
    pub fn password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = password_hash.into();
        self
    }

    pub fn upload_key(mut self, upload_key: impl Into<String>) -> Self {
        self.upload_key = upload_key.into();
        self
    }

    pub fn referral_code(mut self, referral_code: impl Into<String>) -> Self {
        self.referral_code = referral_code.into();
        self
    }

    pub fn referral_limit(mut self, referral_limit: i32) -> Self {
        self.referral_limit = referral_limit;
        self
    }

    pub fn upload_limit(mut self, upload_limit: i64) -> Self {
        self.upload_limit = upload_limit;
        self
    }

    pub fn space_used(mut self, space_used: i64) -> Self {
        self.space_used = space_used;
        self
    }

    pub fn admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    pub fn email_verified(mut self, email_verified: bool) -> Self {
        self.email_verified = email_verified;
        self
    }

    pub fn domain(mut self, domain_id: i32, subdomain: Option<&str>) -> Self {
        self.domain_id = Some(domain_id);
        self.subdomain = subdomain.map(str::to_string);
        self
    }

    pub fn deleted(mut self) -> Self {
        self.deleted_at = Some(Utc::now());
        self
    }

    /// Builds and inserts the user entity into the database.
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            username: ActiveValue::Set(self.username),
            email: ActiveValue::Set(self.email),
            password_hash: ActiveValue::Set(self.password_hash),
            upload_key: ActiveValue::Set(self.upload_key),
            referral_code: ActiveValue::Set(self.referral_code),
            referral_limit: ActiveValue::Set(self.referral_limit),
            upload_limit: ActiveValue::Set(self.upload_limit),
            space_used: ActiveValue::Set(self.space_used),
            admin: ActiveValue::Set(self.admin),
            email_verified: ActiveValue::Set(self.email_verified),
            embed_enabled: ActiveValue::Set(false),
            embed_title: ActiveValue::Set(None),
            embed_description: ActiveValue::Set(None),
            embed_author: ActiveValue::Set(None),
            embed_site_name: ActiveValue::Set(None),
            embed_color: ActiveValue::Set(None),
            url_style: ActiveValue::Set(UrlStyle::Default),
            effect: ActiveValue::Set(Effect::None),
            domain_id: ActiveValue::Set(self.domain_id),
            subdomain: ActiveValue::Set(self.subdomain),
            created_at: ActiveValue::Set(Utc::now()),
            deleted_at: ActiveValue::Set(self.deleted_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a user with default values.
pub async fn create_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).build().await
}

/// Creates an admin user with a verified email.
pub async fn create_admin(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db)
        .admin(true)
        .email_verified(true)
        .build()
        .await
}
