use super::*;

/// Tests which domains a user may select.
///
/// Expected: Ok with public finished domains and the user's own private finished domain
#[tokio::test]
async fn returns_public_and_own_finished_domains() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;

    factory::domain::DomainFactory::new(db, other.id)
        .url("a-public.example")
        .build()
        .await?;
    factory::domain::DomainFactory::new(db, other.id)
        .url("b-private.example")
        .public(false)
        .build()
        .await?;
    factory::domain::DomainFactory::new(db, user.id)
        .url("c-mine.example")
        .public(false)
        .build()
        .await?;
    factory::domain::DomainFactory::new(db, other.id)
        .url("d-waiting.example")
        .progress(DomainProgress::Waiting)
        .build()
        .await?;

    let repo = DomainRepository::new(db);
    let urls: Vec<_> = repo
        .get_available_for(user.id)
        .await?
        .into_iter()
        .map(|d| d.url)
        .collect();

    assert_eq!(urls, vec!["a-public.example", "c-mine.example"]);

    Ok(())
}
