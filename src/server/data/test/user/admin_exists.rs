use super::*;

/// Tests that a database without admins reports none.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_without_admins() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    assert!(!repo.admin_exists().await?);

    Ok(())
}

/// Tests that a live admin is detected.
///
/// Expected: Ok(true)
#[tokio::test]
async fn returns_true_with_admin() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::create_admin(db).await?;

    let repo = UserRepository::new(db);
    assert!(repo.admin_exists().await?);

    Ok(())
}

/// Tests that soft-deleted admins do not count.
///
/// Expected: Ok(false)
#[tokio::test]
async fn ignores_deleted_admins() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::UserFactory::new(db)
        .admin(true)
        .deleted()
        .build()
        .await?;

    let repo = UserRepository::new(db);
    assert!(!repo.admin_exists().await?);

    Ok(())
}
