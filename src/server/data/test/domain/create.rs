use super::*;

/// Tests recording a new domain.
///
/// Expected: Ok with the domain in the Input state and private
#[tokio::test]
async fn creates_input_domain() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = DomainRepository::new(db);
    let domain = repo.create("pics.example.com".to_string(), user.id).await?;

    assert_eq!(domain.progress, DomainProgress::Input);
    assert!(!domain.public);
    assert!(domain.nameservers.is_empty());
    assert!(repo.url_exists("pics.example.com").await?);

    Ok(())
}

/// Tests that the same hostname cannot be recorded twice.
///
/// Expected: Err on the second insert
#[tokio::test]
async fn rejects_duplicate_url() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = DomainRepository::new(db);
    repo.create("pics.example.com".to_string(), user.id).await?;
    let result = repo.create("pics.example.com".to_string(), user.id).await;

    assert!(result.is_err());

    Ok(())
}
