use super::*;

/// Tests claiming the same code twice.
///
/// Expected: first claim wins, second claim reports the code gone
#[tokio::test]
async fn claims_code_once() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let code =
        factory::create_verification(db, user.id, VerificationKind::PasswordReset, "token", 30)
            .await?;

    let repo = VerificationRepository::new(db);

    assert!(repo.claim(code.id).await?);
    assert!(!repo.claim(code.id).await?);
    assert!(!repo.code_exists("token").await?);

    Ok(())
}

/// Tests claiming a code that was replaced by a newer one.
///
/// Expected: the old code can no longer be claimed
#[tokio::test]
async fn replaced_code_cannot_be_claimed() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let repo = VerificationRepository::new(db);

    let old = repo
        .replace(
            user.id,
            VerificationKind::Email,
            "111111".to_string(),
            Utc::now() + Duration::minutes(30),
        )
        .await?;
    repo.replace(
        user.id,
        VerificationKind::Email,
        "222222".to_string(),
        Utc::now() + Duration::minutes(30),
    )
    .await?;

    assert!(!repo.claim(old.id).await?);

    Ok(())
}
