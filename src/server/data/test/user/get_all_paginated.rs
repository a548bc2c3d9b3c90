use super::*;

/// Tests paginating users.
///
/// Expected: Ok with page size respected and total counting all users
#[tokio::test]
async fn paginates_users() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    for _ in 0..5 {
        factory::create_user(db).await?;
    }

    let repo = UserRepository::new(db);
    let (first, total) = repo.get_all_paginated(0, 2, None).await?;
    let (last, _) = repo.get_all_paginated(2, 2, None).await?;

    assert_eq!(total, 5);
    assert_eq!(first.len(), 2);
    assert_eq!(last.len(), 1);

    Ok(())
}

/// Tests filtering users by a username or email substring.
///
/// Expected: Ok with only matching users
#[tokio::test]
async fn filters_by_search() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::UserFactory::new(db)
        .username("alice")
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .username("bob")
        .email("bob@alice.dev")
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .username("carol")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let (users, total) = repo.get_all_paginated(0, 10, Some("alice")).await?;

    assert_eq!(total, 2);
    let mut names: Vec<_> = users.into_iter().map(|u| u.username).collect();
    names.sort();
    assert_eq!(names, vec!["alice", "bob"]);

    Ok(())
}

/// Tests that a blank search is ignored.
///
/// Expected: Ok with all users
#[tokio::test]
async fn ignores_blank_search() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_user(db).await?;
    factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    let (_, total) = repo.get_all_paginated(0, 10, Some("   ")).await?;

    assert_eq!(total, 2);

    Ok(())
}
