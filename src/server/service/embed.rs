//! Share page and oEmbed metadata for uploaded images.
//!
//! Chat clients unfurl the `/i/{slug}` page through its OpenGraph and Twitter meta
//! tags. When the uploader enabled embeds, their title, description, author, site name
//! and colour are rendered through the placeholder templates first.

use std::collections::HashMap;

use sea_orm::DatabaseConnection;

use crate::{
    model::image::OEmbedDto,
    server::{
        config::Settings,
        data::user::UserRepository,
        error::AppError,
        model::{
            image::{Image, ImageLinks},
            user::{effect_name, EmbedSettings, User},
        },
        service::{image::ImageService, link::LinkService, storage::ObjectStore},
        util::{
            html::escape,
            template::{format_bytes, render},
        },
    },
};

/// Embed fields after template rendering; `None` when embeds are disabled or unset.
#[derive(Debug, Default, PartialEq)]
struct RenderedEmbed {
    title: Option<String>,
    description: Option<String>,
    author: Option<String>,
    site_name: Option<String>,
    color: Option<String>,
}

pub struct EmbedService<'a> {
    db: &'a DatabaseConnection,
    storage: &'a dyn ObjectStore,
    settings: &'a Settings,
}

impl<'a> EmbedService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        storage: &'a dyn ObjectStore,
        settings: &'a Settings,
    ) -> Self {
        Self {
            db,
            storage,
            settings,
        }
    }

    /// Renders the HTML share page for an image slug in either URL style.
    pub async fn view_page(&self, slug: &str) -> Result<String, AppError> {
        let (image, uploader) = self.load(slug).await?;
        let links = LinkService::new(self.db, self.settings)
            .image_links(&uploader, &image)
            .await?;
        let embed = render_embed(&uploader.preferences.embed, &image, &uploader);

        Ok(self.page_html(&image, &uploader, &links, &embed))
    }

    /// oEmbed 1.0 `photo` response for an image.
    pub async fn oembed(&self, slug: &str) -> Result<OEmbedDto, AppError> {
        let (image, uploader) = self.load(slug).await?;
        let links = LinkService::new(self.db, self.settings)
            .image_links(&uploader, &image)
            .await?;
        let embed = render_embed(&uploader.preferences.embed, &image, &uploader);

        Ok(OEmbedDto {
            version: "1.0".to_string(),
            kind: "photo".to_string(),
            title: embed.title.or_else(|| Some(image.original_name.clone())),
            author_name: embed.author.or_else(|| Some(uploader.username.clone())),
            author_url: None,
            provider_name: embed.site_name,
            provider_url: self.settings.app_url.clone(),
            url: links.raw_url,
        })
    }

    async fn load(&self, slug: &str) -> Result<(Image, User), AppError> {
        let image = ImageService::new(self.db, self.storage, self.settings)
            .resolve(slug)
            .await?;

        let uploader = UserRepository::new(self.db)
            .find_by_id(image.uploader_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        Ok((image, uploader))
    }

    fn page_html(
        &self,
        image: &Image,
        uploader: &User,
        links: &ImageLinks,
        embed: &RenderedEmbed,
    ) -> String {
        let page_title = embed
            .title
            .clone()
            .unwrap_or_else(|| image.original_name.clone());
        let raw_url = escape(&links.raw_url);

        let mut meta = vec![
            format!(r#"<meta property="og:image" content="{}">"#, raw_url),
            format!(r#"<meta property="og:url" content="{}">"#, escape(&links.url)),
            r#"<meta name="twitter:card" content="summary_large_image">"#.to_string(),
            format!(r#"<meta name="twitter:image" content="{}">"#, raw_url),
        ];

        if let Some(title) = &embed.title {
            meta.push(format!(r#"<meta property="og:title" content="{}">"#, escape(title)));
            meta.push(format!(r#"<meta name="twitter:title" content="{}">"#, escape(title)));
        }
        if let Some(description) = &embed.description {
            meta.push(format!(
                r#"<meta property="og:description" content="{}">"#,
                escape(description)
            ));
            meta.push(format!(
                r#"<meta name="twitter:description" content="{}">"#,
                escape(description)
            ));
        }
        if let Some(site_name) = &embed.site_name {
            meta.push(format!(
                r#"<meta property="og:site_name" content="{}">"#,
                escape(site_name)
            ));
        }
        if let Some(color) = &embed.color {
            meta.push(format!(r#"<meta name="theme-color" content="{}">"#, escape(color)));
        }

        meta.push(format!(
            r#"<link rel="alternate" type="application/json+oembed" href="{}/api/images/{}/oembed" title="{}">"#,
            escape(&self.settings.app_url),
            escape(&image.id),
            escape(&page_title)
        ));

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{meta}
<style>
html, body {{ margin: 0; height: 100%; background: #111; }}
body {{ display: flex; align-items: center; justify-content: center; }}
img {{ max-width: 100%; max-height: 100vh; }}
</style>
</head>
<body data-effect="{effect}">
<img src="{raw}" alt="{name}">
</body>
</html>
"#,
            title = escape(&page_title),
            meta = meta.join("\n"),
            effect = effect_name(uploader.preferences.effect),
            raw = raw_url,
            name = escape(&image.original_name),
        )
    }
}

fn render_embed(settings: &EmbedSettings, image: &Image, uploader: &User) -> RenderedEmbed {
    if !settings.enabled {
        return RenderedEmbed::default();
    }

    let vars = HashMap::from([
        ("image.name", image.original_name.clone()),
        ("image.size", format_bytes(image.size.max(0) as u64)),
        ("image.date", image.created_at.format("%Y-%m-%d").to_string()),
        ("image.type", image.mime_type.clone()),
        ("uploader.name", uploader.username.clone()),
        (
            "uploader.storage_used",
            format_bytes(uploader.space_used.max(0) as u64),
        ),
        (
            "uploader.upload_limit",
            format_bytes(uploader.upload_limit.max(0) as u64),
        ),
    ]);
    let apply = |field: &Option<String>| field.as_deref().map(|t| render(t, &vars));

    RenderedEmbed {
        title: apply(&settings.title),
        description: apply(&settings.description),
        author: apply(&settings.author),
        site_name: apply(&settings.site_name),
        color: settings.color.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{
        data::image::ImageRepository,
        model::{image::CreateImageParam, user::UpdatePreferencesParam},
        service::storage::MemoryStore,
    };
    use entity::user::{Effect, UrlStyle};
    use sea_orm::DbErr;
    use test_utils::{builder::TestBuilder, factory};

    async fn enable_embed(db: &DatabaseConnection, user_id: i32) -> Result<(), DbErr> {
        UserRepository::new(db)
            .update_preferences(
                user_id,
                UpdatePreferencesParam {
                    embed: EmbedSettings {
                        enabled: true,
                        title: Some("{{image.name}} by {{uploader.name}}".to_string()),
                        description: Some("Size: {{image.size}} <b>".to_string()),
                        author: Some("{{uploader.name}}".to_string()),
                        site_name: Some("Pics".to_string()),
                        color: Some("#FF8800".to_string()),
                    },
                    url_style: UrlStyle::Default,
                    effect: Effect::Snow,
                    domain_id: None,
                    subdomain: None,
                },
            )
            .await?;
        Ok(())
    }

    async fn create_image(db: &DatabaseConnection, user_id: i32) -> Result<Image, DbErr> {
        ImageRepository::new(db)
            .create(CreateImageParam {
                id: "Pic12345".to_string(),
                uploader_id: user_id,
                original_name: "sunset.png".to_string(),
                mime_type: "image/png".to_string(),
                size: 1536,
                storage_key: format!("{}/Pic12345.png", user_id),
            })
            .await
    }

    /// Tests the page of an uploader with embeds enabled.
    ///
    /// Expected: rendered, escaped meta tags, theme colour and effect attribute
    #[tokio::test]
    async fn renders_enabled_embed() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = EmbedService::new(db, &store, &settings);

        let user = factory::user::UserFactory::new(db)
            .username("dana")
            .build()
            .await?;
        enable_embed(db, user.id).await?;
        create_image(db, user.id).await?;

        let html = service.view_page("Pic12345").await.unwrap();

        assert!(html.contains(r#"<meta property="og:title" content="sunset.png by dana">"#));
        assert!(html.contains("Size: 1.5 KiB &lt;b&gt;"));
        assert!(html.contains(r##"<meta name="theme-color" content="#FF8800">"##));
        assert!(html.contains(r#"<meta property="og:site_name" content="Pics">"#));
        assert!(html.contains(r#"data-effect="snow""#));
        assert!(html.contains(r#"content="https://img.test/i/Pic12345/raw""#));
        assert!(html.contains("https://img.test/api/images/Pic12345/oembed"));

        Ok(())
    }

    /// Tests the page of an uploader with embeds disabled.
    ///
    /// Expected: image tags only, no title or colour meta
    #[tokio::test]
    async fn omits_embed_fields_when_disabled() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = EmbedService::new(db, &store, &settings);

        let user = factory::create_user(db).await?;
        create_image(db, user.id).await?;

        let html = service.view_page("Pic12345").await.unwrap();

        assert!(html.contains(r#"<meta property="og:image""#));
        assert!(!html.contains("og:title"));
        assert!(!html.contains("theme-color"));
        assert!(html.contains("<title>sunset.png</title>"));
        assert!(html.contains(r#"data-effect="none""#));

        Ok(())
    }

    /// Tests the oEmbed response.
    ///
    /// Expected: photo type pointing at the raw file, author from the template
    #[tokio::test]
    async fn builds_oembed() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = EmbedService::new(db, &store, &settings);

        let user = factory::user::UserFactory::new(db)
            .username("erin")
            .build()
            .await?;
        enable_embed(db, user.id).await?;
        create_image(db, user.id).await?;

        let oembed = service.oembed("Pic12345").await.unwrap();

        assert_eq!(oembed.version, "1.0");
        assert_eq!(oembed.kind, "photo");
        assert_eq!(oembed.author_name.as_deref(), Some("erin"));
        assert_eq!(oembed.provider_name.as_deref(), Some("Pics"));
        assert_eq!(oembed.url, "https://img.test/i/Pic12345/raw");

        Ok(())
    }

    /// Tests that deleted or unknown images have no page.
    ///
    /// Expected: NotFound
    #[tokio::test]
    async fn missing_image_is_not_found() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = EmbedService::new(db, &store, &settings);

        let user = factory::create_user(db).await?;
        let deleted = factory::image::ImageFactory::new(db, user.id)
            .deleted()
            .build()
            .await?;

        assert!(matches!(
            service.view_page(&deleted.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.oembed("Nope0000").await,
            Err(AppError::NotFound(_))
        ));

        Ok(())
    }
}
