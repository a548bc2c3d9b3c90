//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Implementing core business rules and validation
//! - **Orchestration**: Coordinating repository calls with the object store, mailer
//!   and DNS provider
//! - **Domain Models**: Working with domain models rather than DTOs or entity models
//!
//! External collaborators are passed in as trait objects so tests can swap in the
//! in-memory fakes defined next to each trait.

pub mod admin;
pub mod auth;
pub mod dns;
pub mod domain;
pub mod email;
pub mod embed;
pub mod image;
pub mod link;
pub mod log;
pub mod notification;
pub mod preference;
pub mod referral;
pub mod storage;
pub mod trigger;
pub mod upload;
pub mod user;
pub mod verification;
