use super::*;

/// Tests counting and summing live images.
///
/// Expected: Ok with deleted images excluded from both figures
#[tokio::test]
async fn counts_and_sums_live_images() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    factory::image::ImageFactory::new(db, user.id)
        .size(100)
        .build()
        .await?;
    factory::image::ImageFactory::new(db, user.id)
        .size(250)
        .build()
        .await?;
    factory::image::ImageFactory::new(db, user.id)
        .size(999)
        .deleted()
        .build()
        .await?;

    let repo = ImageRepository::new(db);
    assert_eq!(repo.count_live().await?, 2);
    assert_eq!(repo.total_size().await?, 350);

    Ok(())
}

/// Tests totals on an empty table.
///
/// Expected: Ok with zero count and zero size
#[tokio::test]
async fn empty_totals_are_zero() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = ImageRepository::new(db);
    assert_eq!(repo.count_live().await?, 0);
    assert_eq!(repo.total_size().await?, 0);

    Ok(())
}
