//! SeaORM entities for the image host database schema.

pub mod prelude;

pub mod badge;
pub mod domain;
pub mod image;
pub mod log;
pub mod notification;
pub mod referral;
pub mod trigger;
pub mod user;
pub mod verification;
