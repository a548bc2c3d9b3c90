use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "domain")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub url: String,
    pub donator_id: i32,
    pub progress: DomainProgress,
    pub zone_id: Option<String>,
    /// Comma separated nameservers assigned by the DNS provider.
    pub nameservers: Option<String>,
    pub public: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DomainProgress {
    #[sea_orm(string_value = "INPUT")]
    Input,
    #[sea_orm(string_value = "WAITING")]
    Waiting,
    #[sea_orm(string_value = "DONE")]
    Done,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DonatorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Donator,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
