use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct RegisterDto {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Referral code of an existing user, or the one-time setup code.
    pub referral_code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct LoginDto {
    /// Username or email address.
    pub login: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct VerifyEmailDto {
    pub code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PasswordResetRequestDto {
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PasswordResetDto {
    pub token: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ChangePasswordDto {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct BadgeDto {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub email_verified: bool,
    pub space_used: i64,
    pub upload_limit: i64,
    pub referral_limit: i32,
    pub badges: Vec<BadgeDto>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrlStyleDto {
    Default,
    Invisible,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectDto {
    None,
    Snow,
    Rain,
    Hearts,
    Sparkles,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct EmbedSettingsDto {
    pub enabled: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub site_name: Option<String>,
    /// Hex colour in `#RRGGBB` form.
    pub color: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct PreferencesDto {
    pub embed: EmbedSettingsDto,
    pub url_style: UrlStyleDto,
    pub effect: EffectDto,
    pub domain_id: Option<i32>,
    /// Hostname uploads are served from, including the subdomain.
    pub host: String,
    pub subdomain: Option<String>,
    pub upload_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UpdatePreferencesDto {
    pub embed: EmbedSettingsDto,
    pub url_style: UrlStyleDto,
    pub effect: EffectDto,
    pub domain_id: Option<i32>,
    pub subdomain: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct UploadKeyDto {
    pub upload_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ReferredUserDto {
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ReferralsDto {
    pub code: String,
    pub limit: i32,
    pub remaining: i32,
    pub referred: Vec<ReferredUserDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct NotificationDto {
    pub id: i32,
    pub message: String,
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}
