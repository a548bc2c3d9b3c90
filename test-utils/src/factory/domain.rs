//! Domain factory for creating donated domain entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::domain::DomainProgress;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating donated domains.
pub struct DomainFactory<'a> {
    db: &'a DatabaseConnection,
    url: String,
    donator_id: i32,
    progress: DomainProgress,
    zone_id: Option<String>,
    public: bool,
}

impl<'a> DomainFactory<'a> {
    /// Defaults: `"domain{n}.example"`, progress DONE, public.
    pub fn new(db: &'a DatabaseConnection, donator_id: i32) -> Self {
        Self {
            db,
            url: format!("domain{}.example", next_id()),
            donator_id,
            progress: DomainProgress::Done,
            zone_id: None,
            public: true,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn progress(mut self, progress: DomainProgress) -> Self {
        self.progress = progress;
        self
    }

    pub fn zone_id(mut self, zone_id: impl Into<String>) -> Self {
        self.zone_id = Some(zone_id.into());
        self
    }

    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    pub async fn build(self) -> Result<entity::domain::Model, DbErr> {
        entity::domain::ActiveModel {
            url: ActiveValue::Set(self.url),
            donator_id: ActiveValue::Set(self.donator_id),
            progress: ActiveValue::Set(self.progress),
            zone_id: ActiveValue::Set(self.zone_id),
            nameservers: ActiveValue::Set(None),
            public: ActiveValue::Set(self.public),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a public, completed domain donated by the given user.
pub async fn create_domain(
    db: &DatabaseConnection,
    donator_id: i32,
) -> Result<entity::domain::Model, DbErr> {
    DomainFactory::new(db, donator_id).build().await
}
