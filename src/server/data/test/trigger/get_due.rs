use super::*;

/// Tests selecting due triggers.
///
/// Expected: Ok with only past-due triggers, oldest first, up to the limit
#[tokio::test]
async fn returns_due_triggers_in_order() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = TriggerRepository::new(db);
    repo.enqueue(TriggerKind::DomainCheck, 1, 0, now - Duration::minutes(1))
        .await?;
    repo.enqueue(TriggerKind::PurgeUserImages, 2, 0, now - Duration::minutes(10))
        .await?;
    repo.enqueue(TriggerKind::DomainCheck, 3, 0, now + Duration::minutes(5))
        .await?;

    let due = repo.get_due(now, 10).await?;
    let targets: Vec<_> = due.iter().map(|t| t.target_id).collect();
    assert_eq!(targets, vec![2, 1]);

    let limited = repo.get_due(now, 1).await?;
    assert_eq!(limited.len(), 1);

    Ok(())
}
