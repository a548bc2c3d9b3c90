//! Application state shared across all request handlers.
//!
//! `AppState` is built once during startup and cloned into every handler through
//! Axum's state extraction. External collaborators are held as trait objects so the
//! concrete object store, mailer and DNS provider are picked from configuration.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::server::{
    config::Settings,
    service::{
        admin::code::SetupCodeService, dns::DnsProvider, email::Mailer, storage::ObjectStore,
    },
};

/// Application state containing shared resources and dependencies.
///
/// Every field is cheap to clone: the database connection is a pool handle and the
/// rest sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,

    /// Where uploaded files are kept.
    pub storage: Arc<dyn ObjectStore>,

    /// Outgoing mail for verification codes and password resets.
    pub mailer: Arc<dyn Mailer>,

    /// DNS provider for domain donations, `None` when donations are disabled.
    pub dns: Option<Arc<dyn DnsProvider>>,

    /// Holds the one-time code that lets the first user register as admin.
    pub setup_code_service: SetupCodeService,

    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<dyn ObjectStore>,
        mailer: Arc<dyn Mailer>,
        dns: Option<Arc<dyn DnsProvider>>,
        setup_code_service: SetupCodeService,
        settings: Settings,
    ) -> Self {
        Self {
            db,
            storage,
            mailer,
            dns,
            setup_code_service,
            settings: Arc::new(settings),
        }
    }
}
