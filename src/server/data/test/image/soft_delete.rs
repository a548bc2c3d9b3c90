use super::*;

/// Tests soft-deleting a live image.
///
/// Expected: Ok(true) the first time, Ok(false) the second, and hidden from find_live
#[tokio::test]
async fn deletes_once() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, image) = factory::helpers::create_user_with_image(db).await?;

    let repo = ImageRepository::new(db);
    assert!(repo.soft_delete(&image.id).await?);
    assert!(!repo.soft_delete(&image.id).await?);
    assert!(repo.find_live(&image.id).await?.is_none());
    assert!(repo.id_exists(&image.id).await?);

    Ok(())
}

/// Tests permanently removing all rows of an uploader.
///
/// Expected: Ok with live and deleted rows removed, other uploaders untouched
#[tokio::test]
async fn hard_deletes_by_uploader() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    factory::create_image(db, owner.id).await?;
    factory::image::ImageFactory::new(db, owner.id)
        .deleted()
        .build()
        .await?;
    let kept = factory::create_image(db, other.id).await?;

    let repo = ImageRepository::new(db);
    assert_eq!(repo.get_all_by_uploader(owner.id).await?.len(), 2);
    assert_eq!(repo.hard_delete_by_uploader(owner.id).await?, 2);
    assert!(repo.get_all_by_uploader(owner.id).await?.is_empty());
    assert!(repo.find_live(&kept.id).await?.is_some());

    Ok(())
}
