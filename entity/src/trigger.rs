use sea_orm::entity::prelude::*;

/// Deferred job picked up by the scheduler once `run_after` has passed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "trigger")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: TriggerKind,
    pub target_id: i32,
    pub attempts: i32,
    pub run_after: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum TriggerKind {
    #[sea_orm(string_value = "DOMAIN_CHECK")]
    DomainCheck,
    #[sea_orm(string_value = "PURGE_USER_IMAGES")]
    PurgeUserImages,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
