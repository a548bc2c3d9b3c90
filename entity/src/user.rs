use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    #[sea_orm(unique)]
    pub upload_key: String,
    #[sea_orm(unique)]
    pub referral_code: String,
    pub referral_limit: i32,
    pub upload_limit: i64,
    pub space_used: i64,
    pub admin: bool,
    pub email_verified: bool,
    pub embed_enabled: bool,
    pub embed_title: Option<String>,
    pub embed_description: Option<String>,
    pub embed_author: Option<String>,
    pub embed_site_name: Option<String>,
    pub embed_color: Option<String>,
    pub url_style: UrlStyle,
    pub effect: Effect,
    /// Selected donated domain; not a foreign key so domains can be removed
    /// independently of the users pointing at them.
    pub domain_id: Option<i32>,
    pub subdomain: Option<String>,
    pub created_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum UrlStyle {
    #[sea_orm(string_value = "DEFAULT")]
    Default,
    #[sea_orm(string_value = "INVISIBLE")]
    Invisible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Effect {
    #[sea_orm(string_value = "NONE")]
    None,
    #[sea_orm(string_value = "SNOW")]
    Snow,
    #[sea_orm(string_value = "RAIN")]
    Rain,
    #[sea_orm(string_value = "HEARTS")]
    Hearts,
    #[sea_orm(string_value = "SPARKLES")]
    Sparkles,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::image::Entity")]
    Image,
    #[sea_orm(has_many = "super::domain::Entity")]
    Domain,
    #[sea_orm(has_many = "super::badge::Entity")]
    Badge,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl Related<super::domain::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Domain.def()
    }
}

impl Related<super::badge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Badge.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
