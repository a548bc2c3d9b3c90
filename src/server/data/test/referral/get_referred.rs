use super::*;

/// Tests listing and counting users referred by a code owner.
///
/// Expected: Ok with both referred users in registration order
#[tokio::test]
async fn lists_referred_users() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let referrer = factory::create_user(db).await?;
    let first = factory::user::UserFactory::new(db)
        .username("first")
        .build()
        .await?;
    let second = factory::user::UserFactory::new(db)
        .username("second")
        .build()
        .await?;
    let unrelated = factory::create_user(db).await?;

    let repo = ReferralRepository::new(db);
    repo.create(referrer.id, first.id).await?;
    repo.create(referrer.id, second.id).await?;
    factory::create_referral(db, unrelated.id, factory::create_user(db).await?.id).await?;

    assert_eq!(repo.count_by_referrer(referrer.id).await?, 2);

    let referred: Vec<_> = repo
        .get_referred(referrer.id)
        .await?
        .into_iter()
        .map(|r| r.username)
        .collect();
    assert_eq!(referred, vec!["first", "second"]);

    Ok(())
}

/// Tests that a user can only be referred once.
///
/// Expected: Err on the second referral row for the same user
#[tokio::test]
async fn referred_user_is_unique() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let a = factory::create_user(db).await?;
    let b = factory::create_user(db).await?;
    let referred = factory::create_user(db).await?;

    let repo = ReferralRepository::new(db);
    repo.create(a.id, referred.id).await?;

    assert!(repo.create(b.id, referred.id).await.is_err());

    Ok(())
}
