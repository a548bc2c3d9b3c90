use sea_orm::entity::prelude::*;

/// One consumed referral: `referred_id` registered with `referrer_id`'s code.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "referral")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub referrer_id: i32,
    #[sea_orm(unique)]
    pub referred_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReferrerId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Referrer,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReferredId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Referred,
}

impl ActiveModelBehavior for ActiveModel {}
