use crate::server::data::trigger::TriggerRepository;
use chrono::{Duration, Utc};
use entity::trigger::TriggerKind;
use sea_orm::DbErr;
use test_utils::builder::TestBuilder;

mod claim;
mod get_due;
