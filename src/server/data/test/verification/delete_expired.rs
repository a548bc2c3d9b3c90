use super::*;

/// Tests purging expired codes.
///
/// Expected: Ok with only the expired code removed
#[tokio::test]
async fn removes_only_expired_codes() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    factory::create_verification(db, user.id, VerificationKind::Email, "expired", -5).await?;
    factory::create_verification(db, user.id, VerificationKind::PasswordReset, "fresh", 30)
        .await?;

    let repo = VerificationRepository::new(db);
    let removed = repo.delete_expired(Utc::now()).await?;

    assert_eq!(removed, 1);
    assert!(!repo.code_exists("expired").await?);
    assert!(repo.code_exists("fresh").await?);

    Ok(())
}
