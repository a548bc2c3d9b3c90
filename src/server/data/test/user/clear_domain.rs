use super::*;

/// Tests resetting users off a removed domain.
///
/// Expected: Ok with only users of that domain reset
#[tokio::test]
async fn clears_only_matching_users() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let on_domain = factory::user::UserFactory::new(db)
        .domain(7, Some("pics"))
        .build()
        .await?;
    let elsewhere = factory::user::UserFactory::new(db)
        .domain(8, None)
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let reset = repo.clear_domain(7).await?;

    assert_eq!(reset, 1);
    let on_domain = repo.find_by_id(on_domain.id).await?.unwrap();
    assert_eq!(on_domain.preferences.domain_id, None);
    assert_eq!(on_domain.preferences.subdomain, None);
    let elsewhere = repo.find_by_id(elsewhere.id).await?.unwrap();
    assert_eq!(elsewhere.preferences.domain_id, Some(8));

    Ok(())
}
