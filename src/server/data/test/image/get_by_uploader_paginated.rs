use super::*;

/// Tests listing an uploader's own images.
///
/// Expected: Ok with only the uploader's live images counted
#[tokio::test]
async fn lists_only_own_live_images() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;

    for _ in 0..3 {
        factory::create_image(db, owner.id).await?;
    }
    factory::image::ImageFactory::new(db, owner.id)
        .deleted()
        .build()
        .await?;
    factory::create_image(db, other.id).await?;

    let repo = ImageRepository::new(db);
    let (images, total) = repo.get_by_uploader_paginated(owner.id, 0, 2).await?;

    assert_eq!(total, 3);
    assert_eq!(images.len(), 2);
    assert!(images.iter().all(|i| i.uploader_id == owner.id));

    Ok(())
}
