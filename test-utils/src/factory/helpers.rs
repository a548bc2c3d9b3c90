//! Shared helper utilities for factory methods.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique values in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a user owning a single image.
///
/// # Returns
/// - `Ok((user, image))` - The created uploader and their image
/// - `Err(DbErr)` - Database error during creation
pub async fn create_user_with_image(
    db: &DatabaseConnection,
) -> Result<(entity::user::Model, entity::image::Model), DbErr> {
    let user = crate::factory::user::create_user(db).await?;
    let image = crate::factory::image::create_image(db, user.id).await?;

    Ok((user, image))
}
