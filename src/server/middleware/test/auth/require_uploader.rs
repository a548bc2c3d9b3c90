use super::*;

/// Tests authenticating with a raw upload key.
///
/// Expected: Ok(User) owning the key, no session needed
#[tokio::test]
async fn accepts_upload_key() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db)
        .upload_key("k3y")
        .build()
        .await?;

    let returned = AuthGuard::new(db, session)
        .require_uploader(Some("k3y"))
        .await?;

    assert_eq!(returned.id, user.id);

    Ok(())
}

/// Tests the `Bearer` prefix on the header.
///
/// Expected: prefix stripped before lookup
#[tokio::test]
async fn accepts_bearer_prefix() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db)
        .upload_key("k3y")
        .build()
        .await?;

    let returned = AuthGuard::new(db, session)
        .require_uploader(Some("Bearer k3y"))
        .await?;

    assert_eq!(returned.id, user.id);

    Ok(())
}

/// Tests unknown and empty keys.
///
/// Expected: Err(AuthError::InvalidUploadKey) even when a session user exists
#[tokio::test]
async fn rejects_invalid_upload_key() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    AuthSession::new(session).set_user_id(user.id).await?;
    let guard = AuthGuard::new(db, session);

    for key in ["wrong", "", "Bearer "] {
        let result = guard.require_uploader(Some(key)).await;
        assert!(matches!(
            result,
            Err(AppError::AuthErr(AuthError::InvalidUploadKey))
        ));
    }

    Ok(())
}

/// Tests the upload key of a deleted account.
///
/// Expected: Err(AuthError::AccountDeleted)
#[tokio::test]
async fn rejects_key_of_deleted_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    factory::user::UserFactory::new(db)
        .upload_key("k3y")
        .deleted()
        .build()
        .await?;

    let result = AuthGuard::new(db, session)
        .require_uploader(Some("k3y"))
        .await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccountDeleted(_)))
    ));

    Ok(())
}

/// Tests falling back to the session without a header.
///
/// Expected: Ok(User) from the session
#[tokio::test]
async fn falls_back_to_session() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let returned = AuthGuard::new(db, session).require_uploader(None).await?;

    assert_eq!(returned.id, user.id);

    Ok(())
}
