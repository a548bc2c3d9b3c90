//! Request authentication helpers used by controllers.

pub mod auth;
pub mod session;

#[cfg(test)]
mod test;
