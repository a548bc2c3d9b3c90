use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    config::Settings,
    error::AppError,
    service::{dns::DnsProvider, storage::ObjectStore, trigger::TriggerService},
};

/// Starts the trigger scheduler.
///
/// Runs every minute and:
/// - executes due domain checks and image purges from the trigger queue
/// - removes expired verification codes and reset tokens
///
/// The returned scheduler must be kept alive for the job to keep running.
pub async fn start_scheduler(
    db: DatabaseConnection,
    storage: Arc<dyn ObjectStore>,
    dns: Option<Arc<dyn DnsProvider>>,
    settings: Arc<Settings>,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let db = db.clone();
        let storage = storage.clone();
        let dns = dns.clone();
        let settings = settings.clone();

        Box::pin(async move {
            process_triggers(&db, storage.as_ref(), dns.as_deref(), &settings).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Trigger scheduler started");

    Ok(scheduler)
}

/// One scheduler tick. Errors are logged and never stop later ticks.
async fn process_triggers(
    db: &DatabaseConnection,
    storage: &dyn ObjectStore,
    dns: Option<&dyn DnsProvider>,
    settings: &Settings,
) {
    let service = TriggerService::new(db, storage, dns, settings);

    match service.run_due().await {
        Ok(0) => {}
        Ok(ran) => tracing::debug!("Ran {} triggers", ran),
        Err(e) => tracing::error!("Error processing triggers: {}", e),
    }

    if let Err(e) = service.purge_expired_verifications().await {
        tracing::error!("Error purging expired verification codes: {}", e);
    }
}
