use super::*;

/// Tests that a trigger can only be claimed once.
///
/// Expected: Ok(true) then Ok(false), and the queue is empty
#[tokio::test]
async fn claims_once() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TriggerRepository::new(db);
    let trigger = repo
        .enqueue(TriggerKind::DomainCheck, 1, 0, Utc::now())
        .await?;

    assert!(repo.claim(trigger.id).await?);
    assert!(!repo.claim(trigger.id).await?);
    assert!(repo.get_all().await?.is_empty());

    Ok(())
}
