//! Small pure helpers shared across services.

pub mod html;
pub mod parse;
pub mod password;
pub mod random;
pub mod slug;
pub mod template;
pub mod validate;
