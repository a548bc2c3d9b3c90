use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::user::UserDto;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct PaginatedUsersDto {
    pub users: Vec<UserDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Partial user update; absent fields are left unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct UpdateUserDto {
    pub admin: Option<bool>,
    pub upload_limit: Option<i64>,
    pub referral_limit: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct GrantBadgeDto {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct SendNotificationDto {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKindDto {
    Auth,
    Upload,
    Domain,
    Admin,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct LogDto {
    pub id: i32,
    pub kind: LogKindDto,
    pub message: String,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct PaginatedLogsDto {
    pub logs: Vec<LogDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct StatsDto {
    pub users: u64,
    pub images: u64,
    pub storage_used: i64,
}

/// Query string for the admin user listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Case-insensitive substring matched against username and email.
    pub search: Option<String>,
}

/// Query string for the admin log listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogQuery {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub kind: Option<LogKindDto>,
}

fn default_per_page() -> u64 {
    20
}
