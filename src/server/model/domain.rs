//! Donated domain models.
//!
//! A donated domain moves through `Input` (recorded) → `Waiting` (zone created,
//! nameservers handed to the donator) → `Done` (zone active, usable for links).

use chrono::{DateTime, Utc};
use entity::domain::DomainProgress;

use crate::model::domain::{DomainDto, DomainProgressDto};

#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    pub id: i32,
    /// Normalized hostname, e.g. `pics.example.com`.
    pub url: String,
    pub donator_id: i32,
    pub progress: DomainProgress,
    /// DNS provider zone, set on submission.
    pub zone_id: Option<String>,
    /// Nameservers the donator must delegate to.
    pub nameservers: Vec<String>,
    /// Whether users other than the donator may select it.
    pub public: bool,
    pub created_at: DateTime<Utc>,
}

impl Domain {
    pub fn is_done(&self) -> bool {
        self.progress == DomainProgress::Done
    }

    /// Whether `user_id` may use this domain for their links.
    pub fn is_usable_by(&self, user_id: i32) -> bool {
        self.is_done() && (self.public || self.donator_id == user_id)
    }

    pub fn into_dto(self) -> DomainDto {
        DomainDto {
            id: self.id,
            url: self.url,
            donator_id: self.donator_id,
            progress: self.progress.into(),
            nameservers: self.nameservers,
            public: self.public,
            created_at: self.created_at,
        }
    }

    pub fn from_entity(entity: entity::domain::Model) -> Self {
        let nameservers = entity
            .nameservers
            .map(|ns| {
                ns.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: entity.id,
            url: entity.url,
            donator_id: entity.donator_id,
            progress: entity.progress,
            zone_id: entity.zone_id,
            nameservers,
            public: entity.public,
            created_at: entity.created_at,
        }
    }
}

impl From<DomainProgress> for DomainProgressDto {
    fn from(value: DomainProgress) -> Self {
        match value {
            DomainProgress::Input => Self::Input,
            DomainProgress::Waiting => Self::Waiting,
            DomainProgress::Done => Self::Done,
        }
    }
}
