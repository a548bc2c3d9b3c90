use super::*;

/// Tests inserting an image row and reading it back.
///
/// Expected: Ok with the stored fields returned by find_live
#[tokio::test]
async fn creates_image() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = ImageRepository::new(db);
    repo.create(CreateImageParam {
        id: "aB3dE5gH".to_string(),
        uploader_id: user.id,
        original_name: "cat.png".to_string(),
        mime_type: "image/png".to_string(),
        size: 2048,
        storage_key: format!("{}/aB3dE5gH.png", user.id),
    })
    .await?;

    let image = repo.find_live("aB3dE5gH").await?.unwrap();
    assert_eq!(image.original_name, "cat.png");
    assert_eq!(image.size, 2048);
    assert!(repo.id_exists("aB3dE5gH").await?);
    assert!(!repo.id_exists("missing1").await?);

    Ok(())
}
