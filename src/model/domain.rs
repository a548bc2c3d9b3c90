use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainProgressDto {
    Input,
    Waiting,
    Done,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct DomainDto {
    pub id: i32,
    pub url: String,
    pub donator_id: i32,
    pub progress: DomainProgressDto,
    /// Nameservers the donator must delegate to while the domain is waiting.
    pub nameservers: Vec<String>,
    pub public: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AddDomainDto {
    pub domain: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UpdateDomainDto {
    pub public: bool,
}
