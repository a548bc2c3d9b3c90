//! Server-side domain models and parameter types.
//!
//! Domain models are converted from entity models at the repository boundary and
//! transformed to DTOs at the controller boundary. Parameter types carry validated
//! input from controllers into services.

pub mod badge;
pub mod domain;
pub mod image;
pub mod log;
pub mod notification;
pub mod pagination;
pub mod referral;
pub mod stats;
pub mod trigger;
pub mod user;
pub mod verification;
