use crate::server::data::domain::DomainRepository;
use entity::domain::DomainProgress;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod get_available_for;
mod progress;
