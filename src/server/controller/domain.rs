use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        domain::{AddDomainDto, DomainDto},
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::domain::Domain,
        service::domain::DomainService,
        state::AppState,
    },
};

/// Tag for grouping domain endpoints in OpenAPI documentation
pub static DOMAIN_TAG: &str = "domain";

fn into_dtos(domains: Vec<Domain>) -> Vec<DomainDto> {
    domains.into_iter().map(Domain::into_dto).collect()
}

/// Donate a domain.
///
/// The domain starts in `INPUT` and is not used for links until it has been
/// submitted and its nameservers point at the DNS provider.
///
/// # Returns
/// - `201 Created` - Domain recorded
/// - `400 Bad Request` - Not a valid hostname, or the application's own host
/// - `409 Conflict` - Domain already donated
#[utoipa::path(
    post,
    path = "/api/domains",
    tag = DOMAIN_TAG,
    request_body = AddDomainDto,
    responses(
        (status = 201, description = "Domain recorded", body = DomainDto),
        (status = 400, description = "Invalid domain", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 409, description = "Domain already donated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_domain(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AddDomainDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let domain = DomainService::new(&state.db, state.dns.as_deref(), &state.settings)
        .add(&user, &payload.domain)
        .await?;

    Ok((StatusCode::CREATED, Json(domain.into_dto())))
}

/// List domains the logged in user may select for their links.
///
/// Includes every finished public domain plus the user's own finished ones.
#[utoipa::path(
    get,
    path = "/api/domains",
    tag = DOMAIN_TAG,
    responses(
        (status = 200, description = "Selectable domains", body = Vec<DomainDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_available_domains(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let domains = DomainService::new(&state.db, state.dns.as_deref(), &state.settings)
        .list_available(&user)
        .await?;

    Ok((StatusCode::OK, Json(into_dtos(domains))))
}

/// List domains donated by the logged in user, in any state.
#[utoipa::path(
    get,
    path = "/api/domains/own",
    tag = DOMAIN_TAG,
    responses(
        (status = 200, description = "Donated domains", body = Vec<DomainDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_own_domains(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let domains = DomainService::new(&state.db, state.dns.as_deref(), &state.settings)
        .list_own(&user)
        .await?;

    Ok((StatusCode::OK, Json(into_dtos(domains))))
}

/// Submit a domain to the DNS provider.
///
/// Creates the zone, moves the domain to `WAITING` and returns the nameservers
/// the donator must set at their registrar. The scheduler then checks the zone
/// every five minutes.
#[utoipa::path(
    post,
    path = "/api/domains/{domain_id}/submit",
    tag = DOMAIN_TAG,
    params(
        ("domain_id" = i32, Path, description = "Domain ID")
    ),
    responses(
        (status = 200, description = "Zone created, waiting for nameservers", body = DomainDto),
        (status = 400, description = "Domain not in INPUT or donations disabled", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not the donator", body = ErrorDto),
        (status = 404, description = "Domain not found", body = ErrorDto),
        (status = 502, description = "DNS provider failed", body = ErrorDto)
    ),
)]
pub async fn submit_domain(
    State(state): State<AppState>,
    session: Session,
    Path(domain_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let domain = DomainService::new(&state.db, state.dns.as_deref(), &state.settings)
        .submit(&user, domain_id)
        .await?;

    Ok((StatusCode::OK, Json(domain.into_dto())))
}

/// Check a waiting domain right away instead of waiting for the scheduler.
#[utoipa::path(
    post,
    path = "/api/domains/{domain_id}/check",
    tag = DOMAIN_TAG,
    params(
        ("domain_id" = i32, Path, description = "Domain ID")
    ),
    responses(
        (status = 200, description = "Current domain state", body = DomainDto),
        (status = 400, description = "Domain not waiting", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not the donator", body = ErrorDto),
        (status = 404, description = "Domain not found", body = ErrorDto),
        (status = 502, description = "DNS provider failed", body = ErrorDto)
    ),
)]
pub async fn check_domain(
    State(state): State<AppState>,
    session: Session,
    Path(domain_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let domain = DomainService::new(&state.db, state.dns.as_deref(), &state.settings)
        .check_for(&user, domain_id)
        .await?;

    Ok((StatusCode::OK, Json(domain.into_dto())))
}

/// Remove a donated domain. Users who selected it fall back to the default host.
#[utoipa::path(
    delete,
    path = "/api/domains/{domain_id}",
    tag = DOMAIN_TAG,
    params(
        ("domain_id" = i32, Path, description = "Domain ID")
    ),
    responses(
        (status = 204, description = "Domain removed"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not the donator", body = ErrorDto),
        (status = 404, description = "Domain not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_domain(
    State(state): State<AppState>,
    session: Session,
    Path(domain_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    DomainService::new(&state.db, state.dns.as_deref(), &state.settings)
        .delete(&user, domain_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
