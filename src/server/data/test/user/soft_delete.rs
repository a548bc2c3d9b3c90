use super::*;

/// Tests soft-deleting and restoring a user.
///
/// Expected: Ok with deleted_at set after delete and cleared after restore
#[tokio::test]
async fn deletes_and_restores() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    repo.soft_delete(user.id).await?;
    assert!(repo.find_by_id(user.id).await?.unwrap().is_deleted());
    assert_eq!(repo.count_live().await?, 0);

    repo.restore(user.id).await?;
    assert!(!repo.find_by_id(user.id).await?.unwrap().is_deleted());
    assert_eq!(repo.count_live().await?, 1);

    Ok(())
}
