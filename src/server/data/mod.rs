//! Database repository layer for all domain entities.
//!
//! Repositories wrap SeaORM queries for one table each and return server domain models,
//! keeping entity models from leaking into the service layer.

pub mod badge;
pub mod domain;
pub mod image;
pub mod log;
pub mod notification;
pub mod referral;
pub mod trigger;
pub mod user;
pub mod verification;

#[cfg(test)]
mod test;
