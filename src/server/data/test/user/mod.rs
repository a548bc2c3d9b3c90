use crate::server::{
    data::user::UserRepository,
    model::user::{CreateUserParam, EmbedSettings, UpdatePreferencesParam, UpdateUserParam},
};
use entity::user::{Effect, UrlStyle};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod admin_exists;
mod clear_domain;
mod create;
mod find_by_login;
mod get_all_paginated;
mod soft_delete;
mod space;
mod update_admin_fields;
mod update_preferences;
mod username_exists;
