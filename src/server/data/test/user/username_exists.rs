use super::*;

/// Tests that a taken username is reported taken whatever case it is typed in.
///
/// Expected: Ok(true) for "alice", "Alice" and "ALICE"
#[tokio::test]
async fn matches_regardless_of_case() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::UserFactory::new(db)
        .username("Alice")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    assert!(repo.username_exists("alice").await?);
    assert!(repo.username_exists("Alice").await?);
    assert!(repo.username_exists("ALICE").await?);

    Ok(())
}

/// Tests an unused username.
///
/// Expected: Ok(false)
#[tokio::test]
async fn unknown_username_is_free() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::UserFactory::new(db)
        .username("alice")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    assert!(!repo.username_exists("alicia").await?);

    Ok(())
}
