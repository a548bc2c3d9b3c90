use super::*;

/// Tests finding a user by username.
///
/// Expected: Ok(Some) with the matching user
#[tokio::test]
async fn finds_by_username() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let created = factory::user::UserFactory::new(db)
        .username("alice")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let found = repo.find_by_login("alice").await?.unwrap();

    assert_eq!(found.id, created.id);

    Ok(())
}

/// Tests finding a user by email regardless of the case the login was typed in.
///
/// Expected: Ok(Some) with the matching user
#[tokio::test]
async fn finds_by_email_case_insensitively() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let created = factory::user::UserFactory::new(db)
        .email("alice@example.com")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let found = repo.find_by_login("Alice@Example.com").await?.unwrap();

    assert_eq!(found.id, created.id);

    Ok(())
}

/// Tests looking up an unknown login.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_login() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    assert!(repo.find_by_login("nobody").await?.is_none());

    Ok(())
}

/// Tests logging in with a username typed in a different case than it was registered with.
///
/// Expected: Ok(Some) with the matching user
#[tokio::test]
async fn finds_by_username_case_insensitively() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let created = factory::user::UserFactory::new(db)
        .username("Alice")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let found = repo.find_by_login("alice").await?.unwrap();

    assert_eq!(found.id, created.id);

    Ok(())
}
