//! User domain models and parameters.
//!
//! A user owns their upload preferences (embed metadata, URL style, effect and
//! custom host) directly on the account row; `Preferences` groups them for the
//! service layer.

use chrono::{DateTime, Utc};
use entity::user::{Effect, UrlStyle};

use crate::{
    model::{
        admin::{PaginatedUsersDto, UpdateUserDto},
        user::{
            EffectDto, EmbedSettingsDto, PreferencesDto, RegisterDto, UpdatePreferencesDto,
            UrlStyleDto, UserDto,
        },
    },
    server::model::{badge::Badge, pagination::Paginated},
};

/// Registered account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// Secret used by upload clients in place of a session.
    pub upload_key: String,
    /// Code other people register with; usable `referral_limit` times.
    pub referral_code: String,
    pub referral_limit: i32,
    /// Storage quota in bytes.
    pub upload_limit: i64,
    /// Bytes currently stored by this user.
    pub space_used: i64,
    pub admin: bool,
    pub email_verified: bool,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
    /// Set when an admin soft-deletes the account.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn into_dto(self, badges: Vec<Badge>) -> UserDto {
        UserDto {
            id: self.id,
            username: self.username,
            email: self.email,
            admin: self.admin,
            email_verified: self.email_verified,
            space_used: self.space_used,
            upload_limit: self.upload_limit,
            referral_limit: self.referral_limit,
            badges: badges.into_iter().map(Badge::into_dto).collect(),
            created_at: self.created_at,
            deleted_at: self.deleted_at,
        }
    }

    pub fn from_entity(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            password_hash: entity.password_hash,
            upload_key: entity.upload_key,
            referral_code: entity.referral_code,
            referral_limit: entity.referral_limit,
            upload_limit: entity.upload_limit,
            space_used: entity.space_used,
            admin: entity.admin,
            email_verified: entity.email_verified,
            preferences: Preferences {
                embed: EmbedSettings {
                    enabled: entity.embed_enabled,
                    title: entity.embed_title,
                    description: entity.embed_description,
                    author: entity.embed_author,
                    site_name: entity.embed_site_name,
                    color: entity.embed_color,
                },
                url_style: entity.url_style,
                effect: entity.effect,
                domain_id: entity.domain_id,
                subdomain: entity.subdomain,
            },
            created_at: entity.created_at,
            deleted_at: entity.deleted_at,
        }
    }
}

/// OpenGraph metadata shown when an image link is unfurled.
///
/// Text fields may contain `{{key}}` placeholders rendered per image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbedSettings {
    pub enabled: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub site_name: Option<String>,
    pub color: Option<String>,
}

impl EmbedSettings {
    pub fn into_dto(self) -> EmbedSettingsDto {
        EmbedSettingsDto {
            enabled: self.enabled,
            title: self.title,
            description: self.description,
            author: self.author,
            site_name: self.site_name,
            color: self.color,
        }
    }

    /// Empty strings are stored as `None`.
    pub fn from_dto(dto: EmbedSettingsDto) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            enabled: dto.enabled,
            title: non_empty(dto.title),
            description: non_empty(dto.description),
            author: non_empty(dto.author),
            site_name: non_empty(dto.site_name),
            color: non_empty(dto.color),
        }
    }
}

/// Upload preferences stored on the user row.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub embed: EmbedSettings,
    pub url_style: UrlStyle,
    pub effect: Effect,
    /// Donated domain used for links; `None` means the application host.
    pub domain_id: Option<i32>,
    /// Label prepended to the donated domain.
    pub subdomain: Option<String>,
}

/// Validated preference update from the user.
/// Preferences as shown to their owner, with the resolved upload host.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferencesView {
    pub preferences: Preferences,
    pub host: String,
    pub upload_key: String,
}

impl PreferencesView {
    pub fn into_dto(self) -> PreferencesDto {
        PreferencesDto {
            embed: self.preferences.embed.into_dto(),
            url_style: self.preferences.url_style.into(),
            effect: self.preferences.effect.into(),
            domain_id: self.preferences.domain_id,
            host: self.host,
            subdomain: self.preferences.subdomain,
            upload_key: self.upload_key,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePreferencesParam {
    pub embed: EmbedSettings,
    pub url_style: UrlStyle,
    pub effect: Effect,
    pub domain_id: Option<i32>,
    pub subdomain: Option<String>,
}

impl UpdatePreferencesParam {
    pub fn from_dto(dto: UpdatePreferencesDto) -> Self {
        Self {
            embed: EmbedSettings::from_dto(dto.embed),
            url_style: dto.url_style.into(),
            effect: dto.effect.into(),
            domain_id: dto.domain_id,
            subdomain: dto
                .subdomain
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Columns written when creating a new account.
/// Registration input after trimming; validation happens in the auth service.
#[derive(Debug, Clone)]
pub struct RegisterParam {
    pub username: String,
    pub email: String,
    pub password: String,
    pub referral_code: String,
}

impl RegisterParam {
    pub fn from_dto(dto: RegisterDto) -> Self {
        Self {
            username: dto.username.trim().to_string(),
            email: dto.email.trim().to_lowercase(),
            password: dto.password,
            referral_code: dto.referral_code.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserParam {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub upload_key: String,
    pub referral_code: String,
    pub referral_limit: i32,
    pub upload_limit: i64,
    pub admin: bool,
}

/// Admin changes to an account; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParam {
    pub admin: Option<bool>,
    pub upload_limit: Option<i64>,
    pub referral_limit: Option<i32>,
}

impl UpdateUserParam {
    pub fn from_dto(dto: UpdateUserDto) -> Self {
        Self {
            admin: dto.admin,
            upload_limit: dto.upload_limit,
            referral_limit: dto.referral_limit,
        }
    }
}

impl From<UrlStyle> for UrlStyleDto {
    fn from(value: UrlStyle) -> Self {
        match value {
            UrlStyle::Default => Self::Default,
            UrlStyle::Invisible => Self::Invisible,
        }
    }
}

impl From<UrlStyleDto> for UrlStyle {
    fn from(value: UrlStyleDto) -> Self {
        match value {
            UrlStyleDto::Default => Self::Default,
            UrlStyleDto::Invisible => Self::Invisible,
        }
    }
}

impl From<Effect> for EffectDto {
    fn from(value: Effect) -> Self {
        match value {
            Effect::None => Self::None,
            Effect::Snow => Self::Snow,
            Effect::Rain => Self::Rain,
            Effect::Hearts => Self::Hearts,
            Effect::Sparkles => Self::Sparkles,
        }
    }
}

impl From<EffectDto> for Effect {
    fn from(value: EffectDto) -> Self {
        match value {
            EffectDto::None => Self::None,
            EffectDto::Snow => Self::Snow,
            EffectDto::Rain => Self::Rain,
            EffectDto::Hearts => Self::Hearts,
            EffectDto::Sparkles => Self::Sparkles,
        }
    }
}

/// Lowercase name used in the `data-effect` attribute of the view page.
pub fn effect_name(effect: Effect) -> &'static str {
    match effect {
        Effect::None => "none",
        Effect::Snow => "snow",
        Effect::Rain => "rain",
        Effect::Hearts => "hearts",
        Effect::Sparkles => "sparkles",
    }
}

/// Account listed in the admin back-office together with its badges.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithBadges {
    pub user: User,
    pub badges: Vec<Badge>,
}

impl UserWithBadges {
    pub fn into_dto(self) -> UserDto {
        self.user.into_dto(self.badges)
    }
}

impl Paginated<UserWithBadges> {
    pub fn into_dto(self) -> PaginatedUsersDto {
        PaginatedUsersDto {
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
            users: self
                .items
                .into_iter()
                .map(UserWithBadges::into_dto)
                .collect(),
        }
    }
}
