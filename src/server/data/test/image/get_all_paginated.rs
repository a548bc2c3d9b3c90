use super::*;

/// Tests the admin listing across uploaders.
///
/// Expected: Ok with every live image and its uploader's name
#[tokio::test]
async fn includes_uploader_names() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::user::UserFactory::new(db)
        .username("alice")
        .build()
        .await?;
    let bob = factory::user::UserFactory::new(db)
        .username("bob")
        .build()
        .await?;
    factory::create_image(db, alice.id).await?;
    factory::create_image(db, bob.id).await?;
    factory::image::ImageFactory::new(db, bob.id)
        .deleted()
        .build()
        .await?;

    let repo = ImageRepository::new(db);
    let (images, total) = repo.get_all_paginated(0, 10).await?;

    assert_eq!(total, 2);
    let mut names: Vec<_> = images.into_iter().filter_map(|i| i.uploader).collect();
    names.sort();
    assert_eq!(names, vec!["alice", "bob"]);

    Ok(())
}
