//! Draining of the persisted trigger queue.
//!
//! Each due trigger is claimed by deleting its row before it runs. Failures are
//! logged and never propagate to the scheduler. Domain checks that fail or find the
//! zone still inactive, and image purges that fail, re-queue themselves until they
//! run out of attempts.

use chrono::{Duration, Utc};
use entity::{domain::DomainProgress, log::LogKind, trigger::TriggerKind};
use sea_orm::DatabaseConnection;

use crate::server::{
    config::Settings,
    data::{
        domain::DomainRepository, image::ImageRepository, trigger::TriggerRepository,
        user::UserRepository, verification::VerificationRepository,
    },
    error::AppError,
    model::trigger::Trigger,
    service::{
        dns::DnsProvider,
        domain::{DomainService, DOMAIN_CHECK_INTERVAL_MINUTES, DOMAIN_CHECK_MAX_ATTEMPTS},
        log::LogService,
        notification::NotificationService,
        storage::ObjectStore,
    },
};

/// Most triggers handled per run.
const BATCH_SIZE: u64 = 50;

/// Delay before a failed image purge runs again, multiplied by the attempt number.
pub const PURGE_RETRY_MINUTES: i64 = 10;

/// Runs of an image purge before it is abandoned.
pub const PURGE_MAX_ATTEMPTS: i32 = 12;

pub struct TriggerService<'a> {
    db: &'a DatabaseConnection,
    storage: &'a dyn ObjectStore,
    dns: Option<&'a dyn DnsProvider>,
    settings: &'a Settings,
}

impl<'a> TriggerService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        storage: &'a dyn ObjectStore,
        dns: Option<&'a dyn DnsProvider>,
        settings: &'a Settings,
    ) -> Self {
        Self {
            db,
            storage,
            dns,
            settings,
        }
    }

    /// Runs every due trigger this worker manages to claim.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of triggers run
    /// - `Err(AppError::DbErr)` - The queue itself could not be read
    pub async fn run_due(&self) -> Result<usize, AppError> {
        let repo = TriggerRepository::new(self.db);
        let due = repo.get_due(Utc::now(), BATCH_SIZE).await?;

        let mut ran = 0;
        for trigger in due {
            if !repo.claim(trigger.id).await? {
                continue;
            }

            let result = match trigger.kind {
                TriggerKind::DomainCheck => self.run_domain_check(&trigger).await,
                TriggerKind::PurgeUserImages => self.run_purge(&trigger).await,
            };
            if let Err(e) = result {
                tracing::error!(
                    "Trigger {:?} for {} failed: {}",
                    trigger.kind,
                    trigger.target_id,
                    e
                );
            }

            ran += 1;
        }

        Ok(ran)
    }

    /// Removes expired email codes and password reset tokens.
    pub async fn purge_expired_verifications(&self) -> Result<u64, AppError> {
        let removed = VerificationRepository::new(self.db)
            .delete_expired(Utc::now())
            .await?;

        if removed > 0 {
            tracing::debug!("Purged {} expired verification codes", removed);
        }

        Ok(removed)
    }

    async fn run_domain_check(&self, trigger: &Trigger) -> Result<(), AppError> {
        let service = DomainService::new(self.db, self.dns, self.settings);

        match service.check(trigger.target_id).await {
            Ok(domain) if domain.progress == DomainProgress::Waiting => {
                self.requeue_domain_check(trigger).await
            }
            Ok(_) => Ok(()),
            Err(AppError::NotFound(_)) | Err(AppError::BadRequest(_)) => {
                tracing::debug!(
                    "Dropping check of domain {}: no longer waiting",
                    trigger.target_id
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Check of domain {} failed: {}", trigger.target_id, e);
                self.requeue_domain_check(trigger).await
            }
        }
    }

    async fn requeue_domain_check(&self, trigger: &Trigger) -> Result<(), AppError> {
        let attempts = trigger.attempts + 1;

        if attempts < DOMAIN_CHECK_MAX_ATTEMPTS {
            TriggerRepository::new(self.db)
                .enqueue(
                    TriggerKind::DomainCheck,
                    trigger.target_id,
                    attempts,
                    Utc::now() + Duration::minutes(DOMAIN_CHECK_INTERVAL_MINUTES),
                )
                .await?;
            return Ok(());
        }

        let Some(domain) = DomainRepository::new(self.db)
            .find_by_id(trigger.target_id)
            .await?
        else {
            return Ok(());
        };

        tracing::warn!(
            "Giving up on domain {} after {} checks",
            domain.url,
            attempts
        );

        NotificationService::new(self.db)
            .send(
                domain.donator_id,
                format!(
                    "We could not confirm the nameservers of {}. Check your registrar \
                     settings and ask an admin to re-check the domain.",
                    domain.url
                ),
            )
            .await?;
        LogService::new(self.db)
            .record(
                LogKind::Domain,
                format!("Stopped checking domain {} after {} attempts", domain.url, attempts),
                Some(domain.donator_id),
            )
            .await;

        Ok(())
    }

    async fn run_purge(&self, trigger: &Trigger) -> Result<(), AppError> {
        let Err(e) = self.purge_user_images(trigger.target_id).await else {
            return Ok(());
        };

        let attempts = trigger.attempts + 1;
        if attempts >= PURGE_MAX_ATTEMPTS {
            tracing::error!(
                "Giving up on purging images of user {} after {} attempts: {}",
                trigger.target_id,
                attempts,
                e
            );
            LogService::new(self.db)
                .record(
                    LogKind::Admin,
                    format!(
                        "Stopped purging images of deleted user {} after {} attempts",
                        trigger.target_id, attempts
                    ),
                    None,
                )
                .await;
            return Ok(());
        }

        tracing::warn!(
            "Purging images of user {} failed, retrying: {}",
            trigger.target_id,
            e
        );
        TriggerRepository::new(self.db)
            .enqueue(
                TriggerKind::PurgeUserImages,
                trigger.target_id,
                attempts,
                Utc::now() + Duration::minutes(PURGE_RETRY_MINUTES * attempts as i64),
            )
            .await?;

        Ok(())
    }

    /// Deletes every stored object and image row of a soft-deleted user.
    ///
    /// Users restored before the trigger ran are left untouched. If any object cannot
    /// be removed the rows are kept, so a later run still knows which keys to delete.
    async fn purge_user_images(&self, user_id: i32) -> Result<(), AppError> {
        let user_repo = UserRepository::new(self.db);
        let Some(user) = user_repo.find_by_id(user_id).await? else {
            return Ok(());
        };
        if !user.is_deleted() {
            tracing::debug!("User {} was restored, skipping image purge", user_id);
            return Ok(());
        }

        let image_repo = ImageRepository::new(self.db);
        let images = image_repo.get_all_by_uploader(user_id).await?;

        let mut failed = 0;
        for image in &images {
            if let Err(e) = self.storage.delete(&image.storage_key).await {
                tracing::warn!("Failed to remove object {}: {}", image.storage_key, e);
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(AppError::InternalError(format!(
                "{} of {} objects of user {} could not be removed",
                failed,
                images.len(),
                user_id
            )));
        }

        let removed = image_repo.hard_delete_by_uploader(user_id).await?;
        user_repo.release_space(user_id, user.space_used).await?;

        LogService::new(self.db)
            .record(
                LogKind::Admin,
                format!("Purged {} images of deleted user {}", removed, user.username),
                None,
            )
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{
        data::notification::NotificationRepository,
        service::{dns::FakeDns, storage::MemoryStore},
    };
    use axum::body::Bytes;
    use entity::verification::VerificationKind;
    use sea_orm::DbErr;
    use test_utils::{builder::TestBuilder, factory};

    /// Tests a due check of a domain whose zone is active.
    ///
    /// Expected: domain DONE, trigger consumed and not re-queued
    #[tokio::test]
    async fn finishes_active_domain() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let dns = FakeDns::default();
        dns.set_active(true);
        let settings = Settings::for_tests();
        let service = TriggerService::new(db, &store, Some(&dns), &settings);

        let user = factory::create_user(db).await?;
        let domain = factory::domain::DomainFactory::new(db, user.id)
            .progress(DomainProgress::Waiting)
            .zone_id("zone-1")
            .build()
            .await?;
        TriggerRepository::new(db)
            .enqueue(TriggerKind::DomainCheck, domain.id, 0, Utc::now())
            .await?;

        assert_eq!(service.run_due().await.unwrap(), 1);

        let domain = DomainRepository::new(db).find_by_id(domain.id).await?.unwrap();
        assert_eq!(domain.progress, DomainProgress::Done);
        assert!(TriggerRepository::new(db).get_all().await?.is_empty());

        Ok(())
    }

    /// Tests a due check of a domain whose zone is still pending.
    ///
    /// Expected: check re-queued five minutes out with one more attempt
    #[tokio::test]
    async fn requeues_pending_domain() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let dns = FakeDns::default();
        let settings = Settings::for_tests();
        let service = TriggerService::new(db, &store, Some(&dns), &settings);

        let user = factory::create_user(db).await?;
        let domain = factory::domain::DomainFactory::new(db, user.id)
            .progress(DomainProgress::Waiting)
            .zone_id("zone-1")
            .build()
            .await?;
        TriggerRepository::new(db)
            .enqueue(TriggerKind::DomainCheck, domain.id, 3, Utc::now())
            .await?;

        service.run_due().await.unwrap();

        let triggers = TriggerRepository::new(db).get_all().await?;
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].attempts, 4);
        assert!(triggers[0].run_after > Utc::now() + Duration::minutes(4));

        // not due yet, so a second run does nothing
        assert_eq!(service.run_due().await.unwrap(), 0);

        Ok(())
    }

    /// Tests provider failures during a check.
    ///
    /// Expected: error swallowed and the check re-queued
    #[tokio::test]
    async fn requeues_after_provider_failure() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let dns = FakeDns::default();
        dns.set_failing(true);
        let settings = Settings::for_tests();
        let service = TriggerService::new(db, &store, Some(&dns), &settings);

        let user = factory::create_user(db).await?;
        let domain = factory::domain::DomainFactory::new(db, user.id)
            .progress(DomainProgress::Waiting)
            .zone_id("zone-1")
            .build()
            .await?;
        TriggerRepository::new(db)
            .enqueue(TriggerKind::DomainCheck, domain.id, 0, Utc::now())
            .await?;

        assert_eq!(service.run_due().await.unwrap(), 1);
        assert_eq!(TriggerRepository::new(db).get_all().await?.len(), 1);

        Ok(())
    }

    /// Tests the last allowed attempt.
    ///
    /// Expected: no re-queue and the donator is told
    #[tokio::test]
    async fn gives_up_after_max_attempts() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let dns = FakeDns::default();
        let settings = Settings::for_tests();
        let service = TriggerService::new(db, &store, Some(&dns), &settings);

        let user = factory::create_user(db).await?;
        let domain = factory::domain::DomainFactory::new(db, user.id)
            .progress(DomainProgress::Waiting)
            .zone_id("zone-1")
            .build()
            .await?;
        TriggerRepository::new(db)
            .enqueue(
                TriggerKind::DomainCheck,
                domain.id,
                DOMAIN_CHECK_MAX_ATTEMPTS - 1,
                Utc::now(),
            )
            .await?;

        service.run_due().await.unwrap();

        assert!(TriggerRepository::new(db).get_all().await?.is_empty());
        let notifications = NotificationRepository::new(db).get_by_user(user.id).await?;
        assert_eq!(notifications.len(), 1);

        Ok(())
    }

    /// Tests purging the images of a deleted user.
    ///
    /// Expected: objects and rows removed, space reset
    #[tokio::test]
    async fn purges_images_of_deleted_user() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = TriggerService::new(db, &store, None, &settings);

        let user = factory::user::UserFactory::new(db)
            .space_used(1024)
            .deleted()
            .build()
            .await?;
        let image = factory::create_image(db, user.id).await?;
        store
            .put(&image.storage_key, Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        TriggerRepository::new(db)
            .enqueue(TriggerKind::PurgeUserImages, user.id, 0, Utc::now())
            .await?;

        service.run_due().await.unwrap();

        assert_eq!(store.len(), 0);
        assert!(ImageRepository::new(db)
            .get_all_by_uploader(user.id)
            .await?
            .is_empty());
        let user = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
        assert_eq!(user.space_used, 0);

        Ok(())
    }

    /// Tests a purge whose object deletes fail.
    ///
    /// Expected: rows kept and the purge re-queued with a later run time and one more
    /// attempt; once the store recovers the re-queued purge finishes
    #[tokio::test]
    async fn requeues_failed_purge() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = TriggerService::new(db, &store, None, &settings);

        let user = factory::user::UserFactory::new(db).deleted().build().await?;
        let image = factory::create_image(db, user.id).await?;
        store
            .put(&image.storage_key, Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        TriggerRepository::new(db)
            .enqueue(TriggerKind::PurgeUserImages, user.id, 0, Utc::now())
            .await?;

        store.set_failing(true);
        assert_eq!(service.run_due().await.unwrap(), 1);

        let triggers = TriggerRepository::new(db).get_all().await?;
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].kind, TriggerKind::PurgeUserImages);
        assert_eq!(triggers[0].target_id, user.id);
        assert_eq!(triggers[0].attempts, 1);
        assert!(triggers[0].run_after > Utc::now());
        assert!(store.contains(&image.storage_key));
        assert_eq!(
            ImageRepository::new(db)
                .get_all_by_uploader(user.id)
                .await?
                .len(),
            1
        );

        store.set_failing(false);
        let repo = TriggerRepository::new(db);
        assert!(repo.claim(triggers[0].id).await?);
        repo.enqueue(TriggerKind::PurgeUserImages, user.id, 1, Utc::now())
            .await?;
        service.run_due().await.unwrap();

        assert!(repo.get_all().await?.is_empty());
        assert_eq!(store.len(), 0);
        assert!(ImageRepository::new(db)
            .get_all_by_uploader(user.id)
            .await?
            .is_empty());

        Ok(())
    }

    /// Tests the last allowed purge attempt failing.
    ///
    /// Expected: no re-queue
    #[tokio::test]
    async fn gives_up_purge_after_max_attempts() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        store.set_failing(true);
        let settings = Settings::for_tests();
        let service = TriggerService::new(db, &store, None, &settings);

        let user = factory::user::UserFactory::new(db).deleted().build().await?;
        factory::create_image(db, user.id).await?;
        TriggerRepository::new(db)
            .enqueue(
                TriggerKind::PurgeUserImages,
                user.id,
                PURGE_MAX_ATTEMPTS - 1,
                Utc::now(),
            )
            .await?;

        service.run_due().await.unwrap();

        assert!(TriggerRepository::new(db).get_all().await?.is_empty());

        Ok(())
    }

    /// Tests that restored users keep their images.
    ///
    /// Expected: nothing removed
    #[tokio::test]
    async fn skips_purge_for_restored_user() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = TriggerService::new(db, &store, None, &settings);

        let user = factory::create_user(db).await?;
        factory::create_image(db, user.id).await?;
        TriggerRepository::new(db)
            .enqueue(TriggerKind::PurgeUserImages, user.id, 0, Utc::now())
            .await?;

        service.run_due().await.unwrap();

        assert_eq!(
            ImageRepository::new(db)
                .get_all_by_uploader(user.id)
                .await?
                .len(),
            1
        );

        Ok(())
    }

    /// Tests purging expired verification codes.
    ///
    /// Expected: expired codes removed
    #[tokio::test]
    async fn purges_expired_verifications() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let store = MemoryStore::default();
        let settings = Settings::for_tests();
        let service = TriggerService::new(db, &store, None, &settings);

        let user = factory::create_user(db).await?;
        factory::create_verification(db, user.id, VerificationKind::Email, "000000", -1).await?;

        assert_eq!(service.purge_expired_verifications().await.unwrap(), 1);

        Ok(())
    }
}
