use sea_orm::DatabaseConnection;
use std::sync::Arc;
use time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::server::{
    config::{Config, Settings},
    data::user::UserRepository,
    error::AppError,
    service::{
        admin::code::SetupCodeService,
        dns::{CloudflareDns, DnsProvider},
        email::{HttpMailer, LogMailer, Mailer},
        storage::{LocalStore, ObjectStore},
    },
};

/// Sessions expire after this many days without a request.
const SESSION_INACTIVITY_DAYS: i64 = 7;

/// Timeout for calls to the mail and DNS providers.
const HTTP_TIMEOUT_SECONDS: u64 = 15;

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the application can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(Error)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Creates the session layer backed by the application database.
///
/// Session rows live in their own table next to the application tables; the
/// store creates it on first start.
///
/// # Returns
/// - `Ok(SessionManagerLayer)` - Layer with a seven day inactivity expiry
/// - `Err(AppError::SqlxErr)` - Failed to create the session table
pub async fn connect_to_session(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let pool = db.get_sqlite_connection_pool();
    let session_store = SqliteStore::new(pool.clone());

    session_store.migrate().await?;

    Ok(SessionManagerLayer::new(session_store)
        .with_secure(config.session_secure)
        .with_expiry(Expiry::OnInactivity(Duration::days(
            SESSION_INACTIVITY_DAYS,
        ))))
}

/// Builds the HTTP client shared by the mail and DNS providers.
///
/// Redirects are disabled so provider responses cannot bounce requests to other hosts.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECONDS))
        .build()?;

    Ok(client)
}

/// Opens the local object store, creating the directory if needed.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStore>, AppError> {
    let store = LocalStore::new(&config.storage_path).await?;

    tracing::info!("Storing uploads in {}", config.storage_path);

    Ok(Arc::new(store))
}

/// Picks the mail provider; without mail configuration emails are only logged.
pub fn setup_mailer(config: &Config, client: &reqwest::Client) -> Arc<dyn Mailer> {
    match &config.mail {
        Some(mail) => Arc::new(HttpMailer::new(
            client.clone(),
            mail.api_url.clone(),
            mail.api_key.clone(),
            mail.from.clone(),
        )),
        None => {
            tracing::warn!("No mail provider configured, emails will only be logged");
            Arc::new(LogMailer)
        }
    }
}

/// Picks the DNS provider; without Cloudflare credentials domain donations are disabled.
pub fn setup_dns(config: &Config, client: &reqwest::Client) -> Option<Arc<dyn DnsProvider>> {
    match &config.cloudflare {
        Some(cloudflare) => Some(Arc::new(CloudflareDns::new(
            client.clone(),
            cloudflare.api_token.clone(),
            cloudflare.account_id.clone(),
        ))),
        None => {
            tracing::info!("Cloudflare not configured, domain donations are disabled");
            None
        }
    }
}

/// Generates a setup code when no admin exists yet.
///
/// The code replaces a referral code during registration and makes the new
/// account an admin. It is valid for one use within 60 seconds; restart the
/// server to get a new one.
pub async fn check_for_admin(
    db: &DatabaseConnection,
    settings: &Settings,
    setup_code_service: &SetupCodeService,
) -> Result<(), AppError> {
    if UserRepository::new(db).admin_exists().await? {
        return Ok(());
    }

    let code = setup_code_service.generate().await;

    tracing::info!(
        "No admin account exists. Register at {}/register within 60 seconds using referral code: {}",
        settings.app_url,
        code
    );

    Ok(())
}
