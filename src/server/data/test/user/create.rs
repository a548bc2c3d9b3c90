use super::*;

fn param(username: &str, email: &str) -> CreateUserParam {
    CreateUserParam {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        upload_key: format!("key-{}", username),
        referral_code: format!("ref-{}", username),
        referral_limit: 3,
        upload_limit: 1024,
        admin: false,
    }
}

/// Tests creating a user with default preferences.
///
/// Expected: Ok with zero space used, unverified email and default preferences
#[tokio::test]
async fn creates_user_with_defaults() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let user = repo.create(param("alice", "alice@example.com")).await?;

    assert_eq!(user.username, "alice");
    assert_eq!(user.space_used, 0);
    assert!(!user.email_verified);
    assert!(!user.preferences.embed.enabled);
    assert_eq!(user.preferences.url_style, UrlStyle::Default);
    assert_eq!(user.preferences.effect, Effect::None);
    assert!(user.deleted_at.is_none());

    Ok(())
}

/// Tests that the unique username index rejects duplicates.
///
/// Expected: Err on second insert with the same username
#[tokio::test]
async fn rejects_duplicate_username() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    repo.create(param("alice", "alice@example.com")).await?;

    let mut duplicate = param("alice", "other@example.com");
    duplicate.upload_key = "different".to_string();
    duplicate.referral_code = "different".to_string();
    let result = repo.create(duplicate).await;

    assert!(result.is_err());

    Ok(())
}
