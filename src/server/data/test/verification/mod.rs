use crate::server::data::verification::VerificationRepository;
use chrono::{Duration, Utc};
use entity::verification::VerificationKind;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod claim;
mod delete_expired;
mod replace;
