use super::*;

/// Tests storing the zone and nameservers on submission.
///
/// Expected: Ok with Waiting progress and nameservers split back into a list
#[tokio::test]
async fn marks_waiting_with_nameservers() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = DomainRepository::new(db);
    let domain = repo.create("pics.example.com".to_string(), user.id).await?;
    let nameservers = vec!["ada.ns.example".to_string(), "bob.ns.example".to_string()];

    let waiting = repo
        .mark_waiting(domain.id, "zone-1".to_string(), &nameservers)
        .await?
        .unwrap();

    assert_eq!(waiting.progress, DomainProgress::Waiting);
    assert_eq!(waiting.zone_id.as_deref(), Some("zone-1"));
    assert_eq!(waiting.nameservers, nameservers);

    let done = repo
        .set_progress(domain.id, DomainProgress::Done)
        .await?
        .unwrap();
    assert!(done.is_done());

    Ok(())
}

/// Tests updating and deleting a missing domain.
///
/// Expected: Ok(None) and Ok(false)
#[tokio::test]
async fn handles_missing_domain() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = DomainRepository::new(db);
    assert!(repo.set_public(42, true).await?.is_none());
    assert!(!repo.delete(42).await?);

    Ok(())
}
