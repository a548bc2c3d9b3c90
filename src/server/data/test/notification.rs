use crate::server::data::notification::NotificationRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

/// Tests creating and listing notifications.
///
/// Expected: Ok with the user's notifications newest first, unseen
#[tokio::test]
async fn lists_newest_first() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;

    let repo = NotificationRepository::new(db);
    repo.create(user.id, "first".to_string()).await?;
    repo.create(user.id, "second".to_string()).await?;
    repo.create(other.id, "not yours".to_string()).await?;

    let notifications = repo.get_by_user(user.id).await?;
    let messages: Vec<_> = notifications.iter().map(|n| n.message.as_str()).collect();

    assert_eq!(messages, vec!["second", "first"]);
    assert!(notifications.iter().all(|n| !n.seen));

    Ok(())
}

/// Tests that marking seen is scoped to the owner.
///
/// Expected: Ok(false) for another user's notification, Ok(true) for own
#[tokio::test]
async fn mark_seen_is_scoped_to_owner() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;

    let repo = NotificationRepository::new(db);
    let notification = repo.create(user.id, "hello".to_string()).await?;

    assert!(!repo.mark_seen(other.id, notification.id).await?);
    assert!(repo.mark_seen(user.id, notification.id).await?);
    assert!(repo.get_by_user(user.id).await?[0].seen);

    Ok(())
}

/// Tests marking all notifications seen.
///
/// Expected: Ok with the number of previously unseen notifications
#[tokio::test]
async fn marks_all_seen() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = NotificationRepository::new(db);
    let first = repo.create(user.id, "one".to_string()).await?;
    repo.create(user.id, "two".to_string()).await?;
    repo.create(user.id, "three".to_string()).await?;
    repo.mark_seen(user.id, first.id).await?;

    assert_eq!(repo.mark_all_seen(user.id).await?, 2);
    assert!(repo.get_by_user(user.id).await?.iter().all(|n| n.seen));

    Ok(())
}
