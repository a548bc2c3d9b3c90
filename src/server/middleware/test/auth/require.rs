use super::*;

/// Tests an anonymous request.
///
/// Expected: Err(AuthError::UserNotInSession)
#[tokio::test]
async fn rejects_missing_session_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInSession))
    ));

    Ok(())
}

/// Tests a session pointing at a user that no longer exists.
///
/// Expected: Err(AuthError::UserNotInDatabase) with the stale ID
#[tokio::test]
async fn rejects_stale_session_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    AuthSession::new(session).set_user_id(42).await?;

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(42)))
    ));

    Ok(())
}

/// Tests a logged-in user whose account was deleted afterwards.
///
/// Expected: Err(AuthError::AccountDeleted)
#[tokio::test]
async fn rejects_deleted_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db).deleted().build().await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccountDeleted(id))) if id == user.id
    ));

    Ok(())
}

/// Tests the admin permission with an admin user.
///
/// Expected: Ok(User) with admin=true
#[tokio::test]
async fn grants_access_to_admin_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db)
        .username("boss")
        .admin(true)
        .build()
        .await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let returned = AuthGuard::new(db, session)
        .require(&[Permission::Admin])
        .await?;

    assert_eq!(returned.id, user.id);
    assert_eq!(returned.username, "boss");
    assert!(returned.admin);

    Ok(())
}

/// Tests the admin permission with a regular user.
///
/// Expected: Err(AuthError::AccessDenied) mentioning admin
#[tokio::test]
async fn denies_access_to_non_admin_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session)
        .require(&[Permission::Admin])
        .await;

    match result {
        Err(AppError::AuthErr(AuthError::AccessDenied(user_id, message))) => {
            assert_eq!(user_id, user.id);
            assert!(message.contains("admin"));
        }
        other => panic!("Expected AccessDenied, got {:?}", other.map(|u| u.id)),
    }

    Ok(())
}

/// Tests the verified email permission.
///
/// Expected: unverified users get EmailNotVerified, verified users pass
#[tokio::test]
async fn requires_verified_email() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let unverified = factory::user::UserFactory::new(db)
        .email_verified(false)
        .build()
        .await?;
    AuthSession::new(session).set_user_id(unverified.id).await?;

    let result = AuthGuard::new(db, session)
        .require(&[Permission::VerifiedEmail])
        .await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::EmailNotVerified(_)))
    ));

    let verified = factory::user::UserFactory::new(db)
        .email_verified(true)
        .build()
        .await?;
    AuthSession::new(session).set_user_id(verified.id).await?;

    let result = AuthGuard::new(db, session)
        .require(&[Permission::VerifiedEmail])
        .await;
    assert!(result.is_ok());

    Ok(())
}

/// Tests that logging out removes the user from the session.
///
/// Expected: Err(AuthError::UserNotInSession) after clear
#[tokio::test]
async fn clear_logs_user_out() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    let auth_session = AuthSession::new(session);
    auth_session.set_user_id(user.id).await?;
    assert!(auth_session.is_authenticated().await?);

    auth_session.clear().await?;

    let result = AuthGuard::new(db, session).require(&[]).await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInSession))
    ));

    Ok(())
}
