mod model;
mod server;

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::server::{
    config::{Config, Settings},
    error::AppError,
    router,
    scheduler::triggers,
    service::admin::code::{SetupCodeService, SETUP_CODE_TTL},
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let settings = Settings::from_config(&config);

    let db = startup::connect_to_database(&config).await?;
    let session = startup::connect_to_session(&db, &config).await?;
    let http_client = startup::setup_reqwest_client()?;
    let storage = startup::setup_storage(&config).await?;
    let mailer = startup::setup_mailer(&config, &http_client);
    let dns = startup::setup_dns(&config, &http_client);

    let setup_code_service = SetupCodeService::new(SETUP_CODE_TTL);
    startup::check_for_admin(&db, &settings, &setup_code_service).await?;

    let state = AppState::new(
        db,
        storage,
        mailer,
        dns,
        setup_code_service,
        settings,
    );

    let _scheduler = triggers::start_scheduler(
        state.db.clone(),
        state.storage.clone(),
        state.dns.clone(),
        state.settings.clone(),
    )
    .await?;

    let app = router::router(&state.settings)?
        .with_state(state)
        .layer(session);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
