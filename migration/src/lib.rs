pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_user_table;
mod m20260101_000002_create_image_table;
mod m20260101_000003_create_referral_table;
mod m20260101_000004_create_domain_table;
mod m20260101_000005_create_notification_table;
mod m20260101_000006_create_verification_table;
mod m20260101_000007_create_trigger_table;
mod m20260101_000008_create_badge_table;
mod m20260101_000009_create_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_user_table::Migration),
            Box::new(m20260101_000002_create_image_table::Migration),
            Box::new(m20260101_000003_create_referral_table::Migration),
            Box::new(m20260101_000004_create_domain_table::Migration),
            Box::new(m20260101_000005_create_notification_table::Migration),
            Box::new(m20260101_000006_create_verification_table::Migration),
            Box::new(m20260101_000007_create_trigger_table::Migration),
            Box::new(m20260101_000008_create_badge_table::Migration),
            Box::new(m20260101_000009_create_log_table::Migration),
        ]
    }
}
