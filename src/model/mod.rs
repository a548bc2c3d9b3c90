//! Request and response DTOs exchanged over the HTTP API.

pub mod admin;
pub mod api;
pub mod domain;
pub mod image;
pub mod user;
