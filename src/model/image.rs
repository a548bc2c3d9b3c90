use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ImageDto {
    pub id: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    /// Embed page for sharing.
    pub url: String,
    /// Direct link to the stored bytes.
    pub raw_url: String,
    pub delete_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct PaginatedImagesDto {
    pub images: Vec<ImageDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct AdminImageDto {
    pub id: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub uploader_id: i32,
    pub uploader: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct PaginatedAdminImagesDto {
    pub images: Vec<AdminImageDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// oEmbed 1.0 response for an uploaded image.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct OEmbedDto {
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    pub provider_url: String,
    pub url: String,
}

/// ShareX custom uploader (`.sxcu`) definition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ShareXConfigDto {
    pub version: String,
    pub name: String,
    pub destination_type: String,
    pub request_method: String,
    #[serde(rename = "RequestURL")]
    pub request_url: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub file_form_name: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "DeletionURL")]
    pub deletion_url: String,
    pub error_message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ShareNixEngineDto {
    pub name: String,
    pub request_type: String,
    #[serde(rename = "RequestURL")]
    pub request_url: String,
    pub file_form_name: String,
    pub headers: BTreeMap<String, String>,
    pub response_type: String,
    #[serde(rename = "URL")]
    pub url: String,
}

/// ShareNix configuration file with a single upload engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ShareNixConfigDto {
    pub engines: Vec<ShareNixEngineDto>,
    pub default_file_uploader: String,
    pub default_image_uploader: String,
    pub copy_to_clipboard: bool,
    pub notification: bool,
}
