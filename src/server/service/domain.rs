//! Domain donation workflow.
//!
//! A donated domain is recorded in `Input`, submitted to the DNS provider which
//! creates a zone and hands out nameservers (`Waiting`), and becomes usable for share
//! links once the provider reports the zone active (`Done`). Checks of waiting domains
//! are queued as triggers and drained by the scheduler.

use chrono::{Duration, Utc};
use entity::{domain::DomainProgress, log::LogKind, trigger::TriggerKind};
use sea_orm::DatabaseConnection;

use crate::server::{
    config::Settings,
    data::{domain::DomainRepository, trigger::TriggerRepository, user::UserRepository},
    error::{auth::AuthError, validation::ValidationError, AppError},
    model::{domain::Domain, user::User},
    service::{dns::DnsProvider, log::LogService, notification::NotificationService},
    util::validate,
};

/// Delay between two zone status checks.
pub const DOMAIN_CHECK_INTERVAL_MINUTES: i64 = 5;
/// Checks before a waiting domain is given up on; one day at the interval above.
pub const DOMAIN_CHECK_MAX_ATTEMPTS: i32 = 288;

pub struct DomainService<'a> {
    db: &'a DatabaseConnection,
    dns: Option<&'a dyn DnsProvider>,
    settings: &'a Settings,
}

impl<'a> DomainService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        dns: Option<&'a dyn DnsProvider>,
        settings: &'a Settings,
    ) -> Self {
        Self { db, dns, settings }
    }

    /// Records a new donated domain for `user`.
    ///
    /// # Returns
    /// - `Ok(Domain)` - Domain in `Input`
    /// - `Err(AppError::ValidationErr)` - Not a valid hostname, or the service's own host
    /// - `Err(AppError::Conflict)` - Domain already donated
    pub async fn add(&self, user: &User, input: &str) -> Result<Domain, AppError> {
        let hostname = validate::hostname(input)?;

        let app_host = self.settings.app_host();
        if hostname == app_host || hostname.ends_with(&format!(".{}", app_host)) {
            return Err(ValidationError::new(
                "domain",
                "The service's own domain cannot be donated",
            )
            .into());
        }

        let repo = DomainRepository::new(self.db);
        if repo.url_exists(&hostname).await? {
            return Err(AppError::Conflict(format!(
                "{} has already been donated",
                hostname
            )));
        }

        let domain = repo.create(hostname, user.id).await?;

        LogService::new(self.db)
            .record(
                LogKind::Domain,
                format!("{} added domain {}", user.username, domain.url),
                Some(user.id),
            )
            .await;

        Ok(domain)
    }

    /// Creates the DNS zone for a domain in `Input` and queues its first check.
    ///
    /// # Returns
    /// - `Ok(Domain)` - Domain in `Waiting` with the nameservers to delegate to
    /// - `Err(AppError::BadRequest)` - Already submitted, or no DNS provider configured
    /// - `Err(AppError::ProviderErr)` - The DNS provider rejected the zone
    pub async fn submit(&self, actor: &User, id: i32) -> Result<Domain, AppError> {
        let domain = self.find_managed(actor, id).await?;

        if domain.progress != DomainProgress::Input {
            return Err(AppError::BadRequest(
                "Domain has already been submitted".to_string(),
            ));
        }

        let zone = self.dns()?.create_zone(&domain.url).await?;

        let domain = DomainRepository::new(self.db)
            .mark_waiting(domain.id, zone.id, &zone.nameservers)
            .await?
            .ok_or_else(not_found)?;

        TriggerRepository::new(self.db)
            .enqueue(
                TriggerKind::DomainCheck,
                domain.id,
                0,
                Utc::now() + Duration::minutes(DOMAIN_CHECK_INTERVAL_MINUTES),
            )
            .await?;

        LogService::new(self.db)
            .record(
                LogKind::Domain,
                format!("{} submitted domain {}", actor.username, domain.url),
                Some(actor.id),
            )
            .await;

        Ok(domain)
    }

    /// Checks whether the zone of a waiting domain is active and finishes it if so.
    ///
    /// On activation the apex and wildcard records are pointed at the service, the
    /// domain moves to `Done` and the donator is notified. An inactive zone leaves the
    /// domain waiting.
    ///
    /// # Returns
    /// - `Ok(Domain)` - Domain after the check, `Waiting` or `Done`
    /// - `Err(AppError::NotFound)` - Domain no longer exists
    /// - `Err(AppError::BadRequest)` - Domain is not waiting
    pub async fn check(&self, id: i32) -> Result<Domain, AppError> {
        let repo = DomainRepository::new(self.db);
        let domain = repo.find_by_id(id).await?.ok_or_else(not_found)?;

        if domain.progress != DomainProgress::Waiting {
            return Err(AppError::BadRequest(
                "Domain is not waiting for DNS delegation".to_string(),
            ));
        }

        let zone_id = domain.zone_id.clone().ok_or_else(|| {
            AppError::InternalError(format!("Waiting domain {} has no zone", domain.id))
        })?;

        let dns = self.dns()?;
        if !dns.is_zone_active(&zone_id).await? {
            tracing::debug!("Zone for {} is not active yet", domain.url);
            return Ok(domain);
        }

        dns.point_to(&zone_id, &domain.url, &self.settings.app_host())
            .await?;

        let domain = repo
            .set_progress(domain.id, DomainProgress::Done)
            .await?
            .ok_or_else(not_found)?;

        NotificationService::new(self.db)
            .send(
                domain.donator_id,
                format!("Your domain {} is now active. Thank you for donating!", domain.url),
            )
            .await?;
        LogService::new(self.db)
            .record(
                LogKind::Domain,
                format!("Domain {} is active", domain.url),
                Some(domain.donator_id),
            )
            .await;

        tracing::info!("Domain {} finished DNS delegation", domain.url);

        Ok(domain)
    }

    /// Runs a check on behalf of the donator or an admin.
    pub async fn check_for(&self, actor: &User, id: i32) -> Result<Domain, AppError> {
        self.find_managed(actor, id).await?;
        self.check(id).await
    }

    /// Finished domains the user may select: public ones and their own.
    pub async fn list_available(&self, user: &User) -> Result<Vec<Domain>, AppError> {
        let domains = DomainRepository::new(self.db)
            .get_available_for(user.id)
            .await?;
        Ok(domains)
    }

    pub async fn list_own(&self, user: &User) -> Result<Vec<Domain>, AppError> {
        let domains = DomainRepository::new(self.db)
            .get_by_donator(user.id)
            .await?;
        Ok(domains)
    }

    pub async fn list_all(&self) -> Result<Vec<Domain>, AppError> {
        let domains = DomainRepository::new(self.db).get_all().await?;
        Ok(domains)
    }

    pub async fn set_public(&self, actor: &User, id: i32, public: bool) -> Result<Domain, AppError> {
        let domain = DomainRepository::new(self.db)
            .set_public(id, public)
            .await?
            .ok_or_else(not_found)?;

        LogService::new(self.db)
            .record(
                LogKind::Admin,
                format!(
                    "{} made domain {} {}",
                    actor.username,
                    domain.url,
                    if public { "public" } else { "private" }
                ),
                Some(actor.id),
            )
            .await;

        Ok(domain)
    }

    /// Deletes a domain and moves every user who selected it back to the default host.
    pub async fn delete(&self, actor: &User, id: i32) -> Result<(), AppError> {
        let domain = self.find_managed(actor, id).await?;

        let reset = UserRepository::new(self.db).clear_domain(domain.id).await?;
        if !DomainRepository::new(self.db).delete(domain.id).await? {
            return Err(not_found());
        }

        LogService::new(self.db)
            .record(
                LogKind::Domain,
                format!(
                    "{} deleted domain {} ({} users reset)",
                    actor.username, domain.url, reset
                ),
                Some(actor.id),
            )
            .await;

        Ok(())
    }

    /// Loads a domain the actor donated, or any domain for admins.
    async fn find_managed(&self, actor: &User, id: i32) -> Result<Domain, AppError> {
        let domain = DomainRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)?;

        if domain.donator_id != actor.id && !actor.admin {
            return Err(AuthError::AccessDenied(actor.id, format!("manage domain {}", id)).into());
        }

        Ok(domain)
    }

    fn dns(&self) -> Result<&'a dyn DnsProvider, AppError> {
        self.dns.ok_or_else(|| {
            AppError::BadRequest("Domain donations are not enabled on this server".to_string())
        })
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Domain not found".to_string())
}
