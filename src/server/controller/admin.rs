//! Admin back-office endpoints. Every handler requires `Permission::Admin`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        admin::{
            GrantBadgeDto, LogQuery, PaginatedLogsDto, PaginatedUsersDto, SendNotificationDto,
            StatsDto, UpdateUserDto, UserSearchQuery,
        },
        api::{ErrorDto, MessageDto, PageQuery},
        domain::{DomainDto, UpdateDomainDto},
        image::PaginatedAdminImagesDto,
        user::{BadgeDto, NotificationDto, UserDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{domain::Domain, user::UpdateUserParam},
        service::admin::AdminService,
        state::AppState,
    },
};

/// Tag for grouping admin endpoints in OpenAPI documentation
pub static ADMIN_TAG: &str = "admin";

/// List all accounts, deleted ones included.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Page of users", body = PaginatedUsersDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_users(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<UserSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let users = AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .list_users(query.page, query.per_page, query.search.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(users.into_dto())))
}

/// Change an account's admin flag, upload limit or referral limit.
#[utoipa::path(
    patch,
    path = "/api/admin/users/{user_id}",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Invalid limits or self-demotion", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Json(payload): Json<UpdateUserDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let user = AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .update_user(&admin, user_id, UpdateUserParam::from_dto(payload))
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Soft-delete an account. Its images are purged by the scheduler.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Own account or already deleted", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .delete_user(&admin, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{user_id}/restore",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User restored"),
        (status = 400, description = "User not deleted", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn restore_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .restore_user(&admin, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{user_id}/badges",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = GrantBadgeDto,
    responses(
        (status = 201, description = "Badge granted", body = BadgeDto),
        (status = 400, description = "Invalid badge name", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 409, description = "User already has the badge", body = ErrorDto)
    ),
)]
pub async fn grant_badge(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Json(payload): Json<GrantBadgeDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let badge = AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .grant_badge(&admin, user_id, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(badge.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}/badges/{badge_id}",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ("badge_id" = i32, Path, description = "Badge ID")
    ),
    responses(
        (status = 204, description = "Badge revoked"),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Badge not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn revoke_badge(
    State(state): State<AppState>,
    session: Session,
    Path((user_id, badge_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .revoke_badge(&admin, user_id, badge_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Send a notification to a user's inbox.
#[utoipa::path(
    post,
    path = "/api/admin/users/{user_id}/notifications",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = SendNotificationDto,
    responses(
        (status = 201, description = "Notification sent", body = NotificationDto),
        (status = 400, description = "Empty message", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn send_notification(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Json(payload): Json<SendNotificationDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let notification = AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .notify(user_id, payload.message)
        .await?;

    Ok((StatusCode::CREATED, Json(notification.into_dto())))
}

/// List live images across all users, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/images",
    tag = ADMIN_TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "Page of images", body = PaginatedAdminImagesDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_images(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let images = AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .list_images(query.page, query.per_page)
        .await?;

    Ok((StatusCode::OK, Json(images.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/admin/images/{image_id}",
    tag = ADMIN_TAG,
    params(
        ("image_id" = String, Path, description = "Image ID")
    ),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Image not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_image(
    State(state): State<AppState>,
    session: Session,
    Path(image_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .delete_image(&admin, &image_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List every donated domain in any state.
#[utoipa::path(
    get,
    path = "/api/admin/domains",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "All domains", body = Vec<DomainDto>),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_domains(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let domains = AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .list_domains()
        .await?;
    let dtos: Vec<DomainDto> = domains.into_iter().map(Domain::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// Show or hide a domain for users other than its donator.
#[utoipa::path(
    put,
    path = "/api/admin/domains/{domain_id}",
    tag = ADMIN_TAG,
    params(
        ("domain_id" = i32, Path, description = "Domain ID")
    ),
    request_body = UpdateDomainDto,
    responses(
        (status = 200, description = "Updated domain", body = DomainDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Domain not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_domain(
    State(state): State<AppState>,
    session: Session,
    Path(domain_id): Path<i32>,
    Json(payload): Json<UpdateDomainDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let domain = AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .set_domain_public(&admin, domain_id, payload.public)
        .await?;

    Ok((StatusCode::OK, Json(domain.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/admin/domains/{domain_id}",
    tag = ADMIN_TAG,
    params(
        ("domain_id" = i32, Path, description = "Domain ID")
    ),
    responses(
        (status = 204, description = "Domain removed"),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "Domain not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_domain(
    State(state): State<AppState>,
    session: Session,
    Path(domain_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .delete_domain(&admin, domain_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List audit log entries, newest first, optionally of one kind.
#[utoipa::path(
    get,
    path = "/api/admin/logs",
    tag = ADMIN_TAG,
    params(LogQuery),
    responses(
        (status = 200, description = "Page of log entries", body = PaginatedLogsDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_logs(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let logs = AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .list_logs(query.kind.map(Into::into), query.page, query.per_page)
        .await?;

    Ok((StatusCode::OK, Json(logs.into_dto())))
}

#[utoipa::path(
    delete,
    path = "/api/admin/logs",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Log cleared", body = MessageDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn clear_logs(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let removed = AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .clear_logs(&admin)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new(format!("Removed {} log entries", removed))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Instance totals", body = StatsDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_stats(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let stats = AdminService::new(&state.db, state.storage.as_ref(), &state.settings)
        .stats()
        .await?;

    Ok((StatusCode::OK, Json(stats.into_dto())))
}
