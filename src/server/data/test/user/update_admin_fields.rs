use super::*;

/// Tests that only provided fields change.
///
/// Expected: Ok with upload_limit changed and the rest untouched
#[tokio::test]
async fn updates_only_provided_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .referral_limit(5)
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let updated = repo
        .update_admin_fields(
            user.id,
            UpdateUserParam {
                upload_limit: Some(42),
                ..Default::default()
            },
        )
        .await?
        .unwrap();

    assert_eq!(updated.upload_limit, 42);
    assert_eq!(updated.referral_limit, 5);
    assert!(!updated.admin);

    Ok(())
}

/// Tests granting admin through the admin fields update.
///
/// Expected: Ok with admin set
#[tokio::test]
async fn grants_admin() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    let updated = repo
        .update_admin_fields(
            user.id,
            UpdateUserParam {
                admin: Some(true),
                ..Default::default()
            },
        )
        .await?
        .unwrap();

    assert!(updated.admin);

    Ok(())
}
