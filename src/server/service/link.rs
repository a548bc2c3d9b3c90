//! Public URLs for uploaded images.
//!
//! Links are served from the uploader's selected donated domain (optionally under
//! their subdomain) once that domain is usable, and from `APP_URL` otherwise. The
//! delete URL always points at the API on `APP_URL`.

use sea_orm::DatabaseConnection;

use crate::server::{
    config::Settings,
    data::domain::DomainRepository,
    error::AppError,
    model::{
        image::{Image, ImageLinks},
        user::User,
    },
    util::slug::encode_slug,
};

pub struct LinkService<'a> {
    db: &'a DatabaseConnection,
    settings: &'a Settings,
}

impl<'a> LinkService<'a> {
    pub fn new(db: &'a DatabaseConnection, settings: &'a Settings) -> Self {
        Self { db, settings }
    }

    /// Hostname the user's links are served from, including any subdomain.
    pub async fn host_for(&self, user: &User) -> Result<String, AppError> {
        let Some(domain_id) = user.preferences.domain_id else {
            return Ok(self.settings.app_host());
        };

        let domain = DomainRepository::new(self.db).find_by_id(domain_id).await?;

        Ok(match domain {
            Some(domain) if domain.is_usable_by(user.id) => match &user.preferences.subdomain {
                Some(subdomain) => format!("{}.{}", subdomain, domain.url),
                None => domain.url,
            },
            _ => self.settings.app_host(),
        })
    }

    /// Base URL without trailing slash for the user's links.
    pub async fn base_url_for(&self, user: &User) -> Result<String, AppError> {
        if user.preferences.domain_id.is_none() {
            return Ok(self.settings.app_url.clone());
        }

        let host = self.host_for(user).await?;
        if host == self.settings.app_host() {
            return Ok(self.settings.app_url.clone());
        }

        Ok(format!("{}://{}", self.settings.scheme(), host))
    }

    /// Builds links for `image` below an already resolved `base_url`.
    ///
    /// Use this when rendering many images of the same uploader.
    pub fn links(&self, base_url: &str, user: &User, image: &Image) -> ImageLinks {
        ImageLinks {
            url: format!(
                "{}/i/{}",
                base_url,
                encode_slug(&image.id, user.preferences.url_style)
            ),
            raw_url: format!("{}/i/{}/raw", base_url, image.id),
            delete_url: format!("{}/api/images/{}", self.settings.app_url, image.id),
        }
    }

    pub async fn image_links(&self, user: &User, image: &Image) -> Result<ImageLinks, AppError> {
        let base_url = self.base_url_for(user).await?;
        Ok(self.links(&base_url, user, image))
    }
}
