mod domain;
mod image;
mod notification;
mod referral;
mod trigger;
mod user;
mod verification;
