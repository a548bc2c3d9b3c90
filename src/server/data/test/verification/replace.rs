use super::*;

/// Tests that a new code replaces older codes of the same kind.
///
/// Expected: Ok with the old code gone and the new code findable
#[tokio::test]
async fn replaces_previous_code_of_same_kind() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    factory::create_verification(db, user.id, VerificationKind::Email, "111111", 30).await?;

    let repo = VerificationRepository::new(db);
    repo.replace(
        user.id,
        VerificationKind::Email,
        "222222".to_string(),
        Utc::now() + Duration::minutes(30),
    )
    .await?;

    assert!(repo
        .find_by_code(VerificationKind::Email, "111111")
        .await?
        .is_none());
    assert!(repo
        .find_by_code(VerificationKind::Email, "222222")
        .await?
        .is_some());

    Ok(())
}

/// Tests that codes of another kind are kept.
///
/// Expected: Ok with the password reset token still present
#[tokio::test]
async fn keeps_codes_of_other_kind() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    factory::create_verification(db, user.id, VerificationKind::PasswordReset, "reset-token", 60)
        .await?;

    let repo = VerificationRepository::new(db);
    repo.replace(
        user.id,
        VerificationKind::Email,
        "333333".to_string(),
        Utc::now() + Duration::minutes(30),
    )
    .await?;

    assert!(repo
        .find_by_code(VerificationKind::PasswordReset, "reset-token")
        .await?
        .is_some());

    Ok(())
}

/// Tests that a code is only found under its own kind.
///
/// Expected: Ok(None) when looking the email code up as a reset token
#[tokio::test]
async fn lookup_is_scoped_by_kind() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    factory::create_verification(db, user.id, VerificationKind::Email, "444444", 30).await?;

    let repo = VerificationRepository::new(db);
    assert!(repo
        .find_by_code(VerificationKind::PasswordReset, "444444")
        .await?
        .is_none());

    Ok(())
}
