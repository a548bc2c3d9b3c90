use super::*;

/// Tests reserving space within the quota.
///
/// Expected: Ok(true) and space_used increased
#[tokio::test]
async fn reserves_space_within_quota() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .upload_limit(1000)
        .space_used(400)
        .build()
        .await?;

    let repo = UserRepository::new(db);
    assert!(repo.try_reserve_space(user.id, 600).await?);

    let user = repo.find_by_id(user.id).await?.unwrap();
    assert_eq!(user.space_used, 1000);

    Ok(())
}

/// Tests that a reservation exceeding the quota is refused without side effects.
///
/// Expected: Ok(false) and space_used unchanged
#[tokio::test]
async fn refuses_reservation_over_quota() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .upload_limit(1000)
        .space_used(400)
        .build()
        .await?;

    let repo = UserRepository::new(db);
    assert!(!repo.try_reserve_space(user.id, 601).await?);

    let user = repo.find_by_id(user.id).await?.unwrap();
    assert_eq!(user.space_used, 400);

    Ok(())
}

/// Tests that releasing more space than used saturates at zero.
///
/// Expected: Ok with space_used of 0
#[tokio::test]
async fn release_never_goes_negative() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .space_used(100)
        .build()
        .await?;

    let repo = UserRepository::new(db);
    repo.release_space(user.id, 50).await?;
    assert_eq!(repo.find_by_id(user.id).await?.unwrap().space_used, 50);

    repo.release_space(user.id, 500).await?;
    assert_eq!(repo.find_by_id(user.id).await?.unwrap().space_used, 0);

    Ok(())
}
