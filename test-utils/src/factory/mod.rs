//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with a `Factory` builder for customization
//! and a `create_*` convenience function for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let user = factory::user::UserFactory::new(&db)
//!     .username("alice")
//!     .admin(true)
//!     .build()
//!     .await?;
//! let image = factory::create_image(&db, user.id).await?;
//! ```

pub mod domain;
pub mod helpers;
pub mod image;
pub mod referral;
pub mod user;
pub mod verification;

pub use domain::create_domain;
pub use image::create_image;
pub use referral::create_referral;
pub use user::create_user;
pub use verification::create_verification;
