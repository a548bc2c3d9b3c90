//! HTTP request handlers.
//!
//! Controllers authenticate the caller through `AuthGuard`, convert DTOs into
//! parameter types, call a service and convert the result back into a DTO. Each
//! handler carries a `utoipa::path` annotation that feeds the OpenAPI document.

pub mod admin;
pub mod auth;
pub mod domain;
pub mod image;
pub mod upload;
pub mod user;
