use super::*;

/// Tests overwriting every preference column.
///
/// Expected: Ok(Some) with the new preferences persisted
#[tokio::test]
async fn updates_preferences() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    let updated = repo
        .update_preferences(
            user.id,
            UpdatePreferencesParam {
                embed: EmbedSettings {
                    enabled: true,
                    title: Some("{{image.name}}".to_string()),
                    description: None,
                    author: Some("me".to_string()),
                    site_name: None,
                    color: Some("#ff00ff".to_string()),
                },
                url_style: UrlStyle::Invisible,
                effect: Effect::Snow,
                domain_id: Some(3),
                subdomain: Some("pics".to_string()),
            },
        )
        .await?
        .unwrap();

    assert!(updated.preferences.embed.enabled);
    assert_eq!(updated.preferences.embed.title.as_deref(), Some("{{image.name}}"));
    assert_eq!(updated.preferences.url_style, UrlStyle::Invisible);
    assert_eq!(updated.preferences.effect, Effect::Snow);
    assert_eq!(updated.preferences.subdomain.as_deref(), Some("pics"));

    let reloaded = repo.find_by_id(user.id).await?.unwrap();
    assert_eq!(reloaded.preferences, updated.preferences);

    Ok(())
}

/// Tests updating preferences of a missing user.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_user() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let result = repo
        .update_preferences(
            999,
            UpdatePreferencesParam {
                embed: EmbedSettings::default(),
                url_style: UrlStyle::Default,
                effect: Effect::None,
                domain_id: None,
                subdomain: None,
            },
        )
        .await?;

    assert!(result.is_none());

    Ok(())
}
