//! Upload preferences and generated upload-client configs.

use std::collections::BTreeMap;

use sea_orm::DatabaseConnection;

use crate::{
    model::image::{ShareNixConfigDto, ShareNixEngineDto, ShareXConfigDto},
    server::{
        config::Settings,
        data::{domain::DomainRepository, user::UserRepository},
        error::{validation::ValidationError, AppError},
        model::user::{PreferencesView, UpdatePreferencesParam, User},
        service::{auth::UPLOAD_KEY_LENGTH, link::LinkService},
        util::{random::alphanumeric, validate},
    },
};

pub struct PreferenceService<'a> {
    db: &'a DatabaseConnection,
    settings: &'a Settings,
}

impl<'a> PreferenceService<'a> {
    pub fn new(db: &'a DatabaseConnection, settings: &'a Settings) -> Self {
        Self { db, settings }
    }

    pub async fn get(&self, user: &User) -> Result<PreferencesView, AppError> {
        let host = LinkService::new(self.db, self.settings)
            .host_for(user)
            .await?;

        Ok(PreferencesView {
            preferences: user.preferences.clone(),
            host,
            upload_key: user.upload_key.clone(),
        })
    }

    /// Validates and stores new preferences.
    ///
    /// A selected domain must be finished and either public or donated by the user.
    /// A subdomain is only accepted together with a domain.
    ///
    /// # Returns
    /// - `Ok(PreferencesView)` - Stored preferences
    /// - `Err(AppError::ValidationErr)` - Field rejected, named in the error
    pub async fn update(
        &self,
        user: &User,
        param: UpdatePreferencesParam,
    ) -> Result<PreferencesView, AppError> {
        let embed = &param.embed;
        validate::embed_field("embed.title", embed.title.as_deref())?;
        validate::embed_field("embed.description", embed.description.as_deref())?;
        validate::embed_field("embed.author", embed.author.as_deref())?;
        validate::embed_field("embed.site_name", embed.site_name.as_deref())?;
        if let Some(color) = &embed.color {
            validate::color(color)?;
        }

        match (param.domain_id, &param.subdomain) {
            (Some(domain_id), subdomain) => {
                let usable = DomainRepository::new(self.db)
                    .find_by_id(domain_id)
                    .await?
                    .is_some_and(|d| d.is_usable_by(user.id));
                if !usable {
                    return Err(
                        ValidationError::new("domain_id", "Domain is not available").into(),
                    );
                }
                if let Some(subdomain) = subdomain {
                    validate::subdomain(subdomain)?;
                }
            }
            (None, Some(_)) => {
                return Err(ValidationError::new(
                    "subdomain",
                    "A subdomain requires a custom domain",
                )
                .into());
            }
            (None, None) => {}
        }

        let updated = UserRepository::new(self.db)
            .update_preferences(user.id, param)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.get(&updated).await
    }

    /// Replaces the upload key, invalidating every configured upload client.
    pub async fn regenerate_upload_key(&self, user: &User) -> Result<String, AppError> {
        let upload_key = alphanumeric(UPLOAD_KEY_LENGTH);

        UserRepository::new(self.db)
            .set_upload_key(user.id, upload_key.clone())
            .await?;

        tracing::info!("User {} regenerated their upload key", user.id);

        Ok(upload_key)
    }

    /// ShareX custom uploader definition for the user.
    pub async fn sharex_config(&self, user: &User) -> Result<ShareXConfigDto, AppError> {
        let host = LinkService::new(self.db, self.settings)
            .host_for(user)
            .await?;

        Ok(ShareXConfigDto {
            version: "15.0.0".to_string(),
            name: format!("{} ({})", host, user.username),
            destination_type: "ImageUploader, FileUploader".to_string(),
            request_method: "POST".to_string(),
            request_url: self.upload_url(),
            headers: self.upload_headers(user),
            body: "MultipartFormData".to_string(),
            file_form_name: "file".to_string(),
            url: "{json:url}".to_string(),
            deletion_url: "{json:delete_url}".to_string(),
            error_message: "{json:error}".to_string(),
        })
    }

    /// ShareNix configuration with a single engine for the user.
    pub async fn sharenix_config(&self, user: &User) -> Result<ShareNixConfigDto, AppError> {
        let host = LinkService::new(self.db, self.settings)
            .host_for(user)
            .await?;

        Ok(ShareNixConfigDto {
            engines: vec![ShareNixEngineDto {
                name: host.clone(),
                request_type: "POST".to_string(),
                request_url: self.upload_url(),
                file_form_name: "file".to_string(),
                headers: self.upload_headers(user),
                response_type: "Text".to_string(),
                url: "$json:url$".to_string(),
            }],
            default_file_uploader: host.clone(),
            default_image_uploader: host,
            copy_to_clipboard: true,
            notification: true,
        })
    }

    fn upload_url(&self) -> String {
        format!("{}/api/upload", self.settings.app_url)
    }

    fn upload_headers(&self, user: &User) -> BTreeMap<String, String> {
        BTreeMap::from([("Authorization".to_string(), user.upload_key.clone())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::user::EmbedSettings;
    use entity::{
        domain::DomainProgress,
        user::{Effect, UrlStyle},
    };
    use sea_orm::DbErr;
    use test_utils::{builder::TestBuilder, factory};

    fn param(domain_id: Option<i32>, subdomain: Option<&str>) -> UpdatePreferencesParam {
        UpdatePreferencesParam {
            embed: EmbedSettings {
                enabled: true,
                title: Some("{{image.name}}".to_string()),
                color: Some("#00AAFF".to_string()),
                ..Default::default()
            },
            url_style: UrlStyle::Invisible,
            effect: Effect::Hearts,
            domain_id,
            subdomain: subdomain.map(str::to_string),
        }
    }

    /// Tests storing preferences on a public donated domain.
    ///
    /// Expected: fields stored and host includes the subdomain
    #[tokio::test]
    async fn updates_preferences_with_domain() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let settings = Settings::for_tests();
        let service = PreferenceService::new(db, &settings);

        let donator = factory::create_user(db).await?;
        let domain = factory::domain::DomainFactory::new(db, donator.id)
            .url("shots.example")
            .build()
            .await?;
        let user = User::from_entity(factory::create_user(db).await?);

        let view = service
            .update(&user, param(Some(domain.id), Some("fox")))
            .await
            .unwrap();

        assert_eq!(view.host, "fox.shots.example");
        assert_eq!(view.preferences.url_style, UrlStyle::Invisible);
        assert_eq!(view.preferences.effect, Effect::Hearts);
        assert_eq!(view.preferences.embed.color.as_deref(), Some("#00AAFF"));

        Ok(())
    }

    /// Tests that private domains of other users and unfinished domains are rejected.
    ///
    /// Expected: ValidationErr on domain_id
    #[tokio::test]
    async fn rejects_unavailable_domains() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let settings = Settings::for_tests();
        let service = PreferenceService::new(db, &settings);

        let donator = factory::create_user(db).await?;
        let private = factory::domain::DomainFactory::new(db, donator.id)
            .public(false)
            .build()
            .await?;
        let waiting = factory::domain::DomainFactory::new(db, donator.id)
            .progress(DomainProgress::Waiting)
            .build()
            .await?;
        let user = User::from_entity(factory::create_user(db).await?);

        for domain_id in [private.id, waiting.id, 9999] {
            let result = service.update(&user, param(Some(domain_id), None)).await;
            assert!(
                matches!(result, Err(AppError::ValidationErr(ref e)) if e.field == "domain_id")
            );
        }

        let owner = User::from_entity(donator);
        service
            .update(&owner, param(Some(private.id), None))
            .await
            .unwrap();

        Ok(())
    }

    /// Tests subdomain and colour validation.
    ///
    /// Expected: ValidationErr naming each field
    #[tokio::test]
    async fn validates_fields() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let settings = Settings::for_tests();
        let service = PreferenceService::new(db, &settings);

        let user = User::from_entity(factory::create_user(db).await?);

        let result = service.update(&user, param(None, Some("fox"))).await;
        assert!(matches!(result, Err(AppError::ValidationErr(e)) if e.field == "subdomain"));

        let mut bad_color = param(None, None);
        bad_color.embed.color = Some("orange".to_string());
        let result = service.update(&user, bad_color).await;
        assert!(matches!(result, Err(AppError::ValidationErr(e)) if e.field == "embed.color"));

        let mut long_title = param(None, None);
        long_title.embed.title = Some("x".repeat(257));
        let result = service.update(&user, long_title).await;
        assert!(matches!(result, Err(AppError::ValidationErr(e)) if e.field == "embed.title"));

        Ok(())
    }

    /// Tests regenerating the upload key.
    ///
    /// Expected: new key stored and the old one no longer resolves
    #[tokio::test]
    async fn regenerates_upload_key() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let settings = Settings::for_tests();
        let service = PreferenceService::new(db, &settings);

        let user = User::from_entity(factory::create_user(db).await?);
        let key = service.regenerate_upload_key(&user).await.unwrap();

        assert_eq!(key.len(), UPLOAD_KEY_LENGTH);
        let repo = UserRepository::new(db);
        assert!(repo.find_by_upload_key(&user.upload_key).await?.is_none());
        assert_eq!(repo.find_by_upload_key(&key).await?.unwrap().id, user.id);

        Ok(())
    }

    /// Tests the generated upload-client configs.
    ///
    /// Expected: both point at the upload endpoint with the key header
    #[tokio::test]
    async fn builds_upload_client_configs() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let settings = Settings::for_tests();
        let service = PreferenceService::new(db, &settings);

        let user = User::from_entity(factory::create_user(db).await?);

        let sharex = service.sharex_config(&user).await.unwrap();
        assert_eq!(sharex.request_url, "https://img.test/api/upload");
        assert_eq!(sharex.headers.get("Authorization"), Some(&user.upload_key));
        assert_eq!(sharex.file_form_name, "file");

        let json = serde_json::to_value(&sharex).unwrap();
        assert_eq!(json["RequestURL"], "https://img.test/api/upload");
        assert_eq!(json["URL"], "{json:url}");

        let sharenix = service.sharenix_config(&user).await.unwrap();
        assert_eq!(sharenix.engines.len(), 1);
        assert_eq!(sharenix.default_image_uploader, "img.test");
        assert_eq!(
            sharenix.engines[0].headers.get("Authorization"),
            Some(&user.upload_key)
        );

        Ok(())
    }
}
