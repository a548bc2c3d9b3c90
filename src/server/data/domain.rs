//! Donated domain repository.

use chrono::Utc;
use entity::domain::DomainProgress;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::domain::Domain;

pub struct DomainRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DomainRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a new domain in the `Input` state.
    ///
    /// `url` must already be normalized; uniqueness is enforced by the column index.
    pub async fn create(&self, url: String, donator_id: i32) -> Result<Domain, DbErr> {
        let entity = entity::domain::ActiveModel {
            url: ActiveValue::Set(url),
            donator_id: ActiveValue::Set(donator_id),
            progress: ActiveValue::Set(DomainProgress::Input),
            zone_id: ActiveValue::Set(None),
            nameservers: ActiveValue::Set(None),
            public: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Domain::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Domain>, DbErr> {
        let entity = entity::prelude::Domain::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Domain::from_entity))
    }

    pub async fn url_exists(&self, url: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::Domain::find()
            .filter(entity::domain::Column::Url.eq(url))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn get_all(&self) -> Result<Vec<Domain>, DbErr> {
        let entities = entity::prelude::Domain::find()
            .order_by_asc(entity::domain::Column::Url)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Domain::from_entity).collect())
    }

    pub async fn get_by_donator(&self, donator_id: i32) -> Result<Vec<Domain>, DbErr> {
        let entities = entity::prelude::Domain::find()
            .filter(entity::domain::Column::DonatorId.eq(donator_id))
            .order_by_desc(entity::domain::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Domain::from_entity).collect())
    }

    /// Finished domains that are public or donated by `user_id`.
    pub async fn get_available_for(&self, user_id: i32) -> Result<Vec<Domain>, DbErr> {
        let entities = entity::prelude::Domain::find()
            .filter(entity::domain::Column::Progress.eq(DomainProgress::Done))
            .filter(
                Condition::any()
                    .add(entity::domain::Column::Public.eq(true))
                    .add(entity::domain::Column::DonatorId.eq(user_id)),
            )
            .order_by_asc(entity::domain::Column::Url)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Domain::from_entity).collect())
    }

    /// Stores the provider zone and moves the domain to `Waiting`.
    pub async fn mark_waiting(
        &self,
        id: i32,
        zone_id: String,
        nameservers: &[String],
    ) -> Result<Option<Domain>, DbErr> {
        let Some(existing) = entity::prelude::Domain::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active: entity::domain::ActiveModel = existing.into();
        active.zone_id = ActiveValue::Set(Some(zone_id));
        active.nameservers = ActiveValue::Set(Some(nameservers.join(",")));
        active.progress = ActiveValue::Set(DomainProgress::Waiting);

        Ok(Some(Domain::from_entity(active.update(self.db).await?)))
    }

    pub async fn set_progress(
        &self,
        id: i32,
        progress: DomainProgress,
    ) -> Result<Option<Domain>, DbErr> {
        let Some(existing) = entity::prelude::Domain::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active: entity::domain::ActiveModel = existing.into();
        active.progress = ActiveValue::Set(progress);

        Ok(Some(Domain::from_entity(active.update(self.db).await?)))
    }

    pub async fn set_public(&self, id: i32, public: bool) -> Result<Option<Domain>, DbErr> {
        let Some(existing) = entity::prelude::Domain::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active: entity::domain::ActiveModel = existing.into();
        active.public = ActiveValue::Set(public);

        Ok(Some(Domain::from_entity(active.update(self.db).await?)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Domain::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
