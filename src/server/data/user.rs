//! User data repository for database operations.
//!
//! Provides the `UserRepository` for account creation, lookups by the various unique
//! credentials, preference updates, quota accounting and admin management.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::user::{CreateUserParam, UpdatePreferencesParam, UpdateUserParam, User};

/// Case-insensitive match on the username column.
fn username_matches(username: &str) -> Condition {
    Condition::all().add(Expr::cust_with_values(
        "LOWER(\"username\") = ?",
        [username.to_lowercase()],
    ))
}

/// Repository providing database operations for user management.
pub struct UserRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection, or an open transaction
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a new account with default preferences.
    ///
    /// # Returns
    /// - `Ok(User)` - The created user
    /// - `Err(DbErr)` - Insert failed, e.g. on a unique constraint
    pub async fn create(&self, param: CreateUserParam) -> Result<User, DbErr> {
        let entity = entity::user::ActiveModel {
            username: ActiveValue::Set(param.username),
            email: ActiveValue::Set(param.email),
            password_hash: ActiveValue::Set(param.password_hash),
            upload_key: ActiveValue::Set(param.upload_key),
            referral_code: ActiveValue::Set(param.referral_code),
            referral_limit: ActiveValue::Set(param.referral_limit),
            upload_limit: ActiveValue::Set(param.upload_limit),
            space_used: ActiveValue::Set(0),
            admin: ActiveValue::Set(param.admin),
            email_verified: ActiveValue::Set(false),
            embed_enabled: ActiveValue::Set(false),
            embed_title: ActiveValue::Set(None),
            embed_description: ActiveValue::Set(None),
            embed_author: ActiveValue::Set(None),
            embed_site_name: ActiveValue::Set(None),
            embed_color: ActiveValue::Set(None),
            url_style: ActiveValue::Set(entity::user::UrlStyle::Default),
            effect: ActiveValue::Set(entity::user::Effect::None),
            domain_id: ActiveValue::Set(None),
            subdomain: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            deleted_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(User::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find_by_id(id).one(self.db).await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user by username or email, whichever `login` matches.
    ///
    /// Emails are stored lowercased, so the email comparison lowercases `login`.
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(
                Condition::any()
                    .add(username_matches(login))
                    .add(entity::user::Column::Email.eq(login.to_lowercase())),
            )
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.to_lowercase()))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    pub async fn find_by_upload_key(&self, upload_key: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::UploadKey.eq(upload_key))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    pub async fn find_by_referral_code(&self, code: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::ReferralCode.eq(code))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Usernames keep their display case but are unique regardless of it.
    pub async fn username_exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::User::find()
            .filter(username_matches(username))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.to_lowercase()))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks if any live admin users exist in the database.
    ///
    /// Used at startup to decide whether a setup code must be generated.
    pub async fn admin_exists(&self) -> Result<bool, DbErr> {
        let admin_count = entity::prelude::User::find()
            .filter(entity::user::Column::Admin.eq(true))
            .filter(entity::user::Column::DeletedAt.is_null())
            .count(self.db)
            .await?;

        Ok(admin_count > 0)
    }

    /// Counts accounts that have not been soft-deleted.
    pub async fn count_live(&self) -> Result<u64, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::DeletedAt.is_null())
            .count(self.db)
            .await
    }

    /// Gets users with pagination, newest first, including soft-deleted accounts.
    ///
    /// # Arguments
    /// - `page` - Zero-indexed page number
    /// - `per_page` - Number of users to return per page
    /// - `search` - Optional substring matched against username and email
    ///
    /// # Returns
    /// - `Ok((users, total))` - Users for the requested page and the total matching count
    /// - `Err(DbErr)` - Database error during pagination query
    pub async fn get_all_paginated(
        &self,
        page: u64,
        per_page: u64,
        search: Option<&str>,
    ) -> Result<(Vec<User>, u64), DbErr> {
        let mut query = entity::prelude::User::find();

        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(entity::user::Column::Username.contains(search))
                    .add(entity::user::Column::Email.contains(search)),
            );
        }

        let paginator = query
            .order_by_desc(entity::user::Column::CreatedAt)
            .order_by_desc(entity::user::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page).await?;
        let users = entities.into_iter().map(User::from_entity).collect();

        Ok((users, total))
    }

    pub async fn update_password(&self, id: i32, password_hash: String) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(
                entity::user::Column::PasswordHash,
                Expr::value(password_hash),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    pub async fn set_email_verified(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(entity::user::Column::EmailVerified, Expr::value(true))
            .exec(self.db)
            .await?;
        Ok(())
    }

    pub async fn set_upload_key(&self, id: i32, upload_key: String) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(entity::user::Column::UploadKey, Expr::value(upload_key))
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Overwrites all preference columns.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - Updated user
    /// - `Ok(None)` - No user with that ID
    pub async fn update_preferences(
        &self,
        id: i32,
        param: UpdatePreferencesParam,
    ) -> Result<Option<User>, DbErr> {
        let Some(existing) = entity::prelude::User::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active: entity::user::ActiveModel = existing.into();
        active.embed_enabled = ActiveValue::Set(param.embed.enabled);
        active.embed_title = ActiveValue::Set(param.embed.title);
        active.embed_description = ActiveValue::Set(param.embed.description);
        active.embed_author = ActiveValue::Set(param.embed.author);
        active.embed_site_name = ActiveValue::Set(param.embed.site_name);
        active.embed_color = ActiveValue::Set(param.embed.color);
        active.url_style = ActiveValue::Set(param.url_style);
        active.effect = ActiveValue::Set(param.effect);
        active.domain_id = ActiveValue::Set(param.domain_id);
        active.subdomain = ActiveValue::Set(param.subdomain);

        let entity = active.update(self.db).await?;

        Ok(Some(User::from_entity(entity)))
    }

    /// Atomically adds `bytes` to `space_used` if the result stays within `upload_limit`.
    ///
    /// # Returns
    /// - `Ok(true)` - Space reserved
    /// - `Ok(false)` - Quota would be exceeded (or the user does not exist)
    pub async fn try_reserve_space(&self, id: i32, bytes: i64) -> Result<bool, DbErr> {
        let result = entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .filter(Expr::cust_with_values(
                "\"space_used\" + ? <= \"upload_limit\"",
                [bytes],
            ))
            .col_expr(
                entity::user::Column::SpaceUsed,
                Expr::cust_with_values("\"space_used\" + ?", [bytes]),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Subtracts `bytes` from `space_used`, never going below zero.
    pub async fn release_space(&self, id: i32, bytes: i64) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(
                entity::user::Column::SpaceUsed,
                Expr::cust_with_values("MAX(\"space_used\" - ?, 0)", [bytes]),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Applies admin changes; unset fields are left as they are.
    pub async fn update_admin_fields(
        &self,
        id: i32,
        param: UpdateUserParam,
    ) -> Result<Option<User>, DbErr> {
        let Some(existing) = entity::prelude::User::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active: entity::user::ActiveModel = existing.into();
        if let Some(admin) = param.admin {
            active.admin = ActiveValue::Set(admin);
        }
        if let Some(upload_limit) = param.upload_limit {
            active.upload_limit = ActiveValue::Set(upload_limit);
        }
        if let Some(referral_limit) = param.referral_limit {
            active.referral_limit = ActiveValue::Set(referral_limit);
        }

        let entity = active.update(self.db).await?;

        Ok(Some(User::from_entity(entity)))
    }

    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(entity::user::Column::DeletedAt, Expr::value(Utc::now()))
            .exec(self.db)
            .await?;
        Ok(())
    }

    pub async fn restore(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(
                entity::user::Column::DeletedAt,
                Expr::value(Option::<chrono::DateTime<Utc>>::None),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Resets every user who selected `domain_id` back to the application host.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of users reset
    pub async fn clear_domain(&self, domain_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::User::update_many()
            .filter(entity::user::Column::DomainId.eq(domain_id))
            .col_expr(
                entity::user::Column::DomainId,
                Expr::value(Option::<i32>::None),
            )
            .col_expr(
                entity::user::Column::Subdomain,
                Expr::value(Option::<String>::None),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
