use crate::server::data::referral::ReferralRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod get_referred;
