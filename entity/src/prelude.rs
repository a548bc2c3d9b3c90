pub use super::badge::Entity as Badge;
pub use super::domain::Entity as Domain;
pub use super::image::Entity as Image;
pub use super::log::Entity as Log;
pub use super::notification::Entity as Notification;
pub use super::referral::Entity as Referral;
pub use super::trigger::Entity as Trigger;
pub use super::user::Entity as User;
pub use super::verification::Entity as Verification;
