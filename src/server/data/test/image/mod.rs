use crate::server::{data::image::ImageRepository, model::image::CreateImageParam};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod get_all_paginated;
mod get_by_uploader_paginated;
mod soft_delete;
mod totals;
