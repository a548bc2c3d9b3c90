use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        image::{ShareNixConfigDto, ShareXConfigDto},
        user::{
            NotificationDto, PreferencesDto, ReferralsDto, UpdatePreferencesDto, UploadKeyDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::user::UpdatePreferencesParam,
        service::{
            notification::NotificationService, preference::PreferenceService,
            referral::ReferralService,
        },
        state::AppState,
    },
};

/// Tag for grouping user endpoints in OpenAPI documentation
pub static USER_TAG: &str = "user";

/// Get the logged in user's upload preferences and the host their links use.
#[utoipa::path(
    get,
    path = "/api/user/preferences",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Current preferences", body = PreferencesDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_preferences(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let view = PreferenceService::new(&state.db, &state.settings)
        .get(&user)
        .await?;

    Ok((StatusCode::OK, Json(view.into_dto())))
}

/// Replace the logged in user's upload preferences.
///
/// # Returns
/// - `200 OK` - Preferences saved
/// - `400 Bad Request` - Invalid embed text, colour, domain or subdomain
#[utoipa::path(
    put,
    path = "/api/user/preferences",
    tag = USER_TAG,
    request_body = UpdatePreferencesDto,
    responses(
        (status = 200, description = "Preferences saved", body = PreferencesDto),
        (status = 400, description = "Invalid preferences", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_preferences(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdatePreferencesDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let view = PreferenceService::new(&state.db, &state.settings)
        .update(&user, UpdatePreferencesParam::from_dto(payload))
        .await?;

    Ok((StatusCode::OK, Json(view.into_dto())))
}

/// Replace the upload key. Existing uploader configs stop working.
#[utoipa::path(
    post,
    path = "/api/user/upload-key",
    tag = USER_TAG,
    responses(
        (status = 200, description = "New upload key", body = UploadKeyDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn regenerate_upload_key(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let upload_key = PreferenceService::new(&state.db, &state.settings)
        .regenerate_upload_key(&user)
        .await?;

    Ok((StatusCode::OK, Json(UploadKeyDto { upload_key })))
}

/// Download a ShareX custom uploader file for this account.
#[utoipa::path(
    get,
    path = "/api/user/config/sharex",
    tag = USER_TAG,
    responses(
        (status = 200, description = "ShareX .sxcu file", body = ShareXConfigDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn sharex_config(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let config = PreferenceService::new(&state.db, &state.settings)
        .sharex_config(&user)
        .await?;
    let disposition = format!("attachment; filename=\"{}.sxcu\"", config.name);

    Ok((
        StatusCode::OK,
        [(header::CONTENT_DISPOSITION, disposition)],
        Json(config),
    ))
}

/// Download a ShareNix configuration for this account.
#[utoipa::path(
    get,
    path = "/api/user/config/sharenix",
    tag = USER_TAG,
    responses(
        (status = 200, description = "ShareNix config", body = ShareNixConfigDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn sharenix_config(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let config = PreferenceService::new(&state.db, &state.settings)
        .sharenix_config(&user)
        .await?;

    Ok((
        StatusCode::OK,
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\".sharenix.json\"".to_string(),
        )],
        Json(config),
    ))
}

/// Get the user's referral code, how many uses remain and who used it.
#[utoipa::path(
    get,
    path = "/api/user/referrals",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Referral overview", body = ReferralsDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_referrals(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let referrals = ReferralService::new(&state.db).get(&user).await?;

    Ok((StatusCode::OK, Json(referrals.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/user/notifications",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Notifications, newest first", body = Vec<NotificationDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let notifications = NotificationService::new(&state.db).list(user.id).await?;
    let dtos: Vec<NotificationDto> = notifications.into_iter().map(|n| n.into_dto()).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

#[utoipa::path(
    post,
    path = "/api/user/notifications/{notification_id}/seen",
    tag = USER_TAG,
    params(
        ("notification_id" = i32, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Marked as seen"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Notification not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mark_notification_seen(
    State(state): State<AppState>,
    session: Session,
    Path(notification_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    NotificationService::new(&state.db)
        .mark_seen(user.id, notification_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/user/notifications/seen",
    tag = USER_TAG,
    responses(
        (status = 200, description = "All notifications marked as seen", body = MessageDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mark_all_notifications_seen(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let marked = NotificationService::new(&state.db)
        .mark_all_seen(user.id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new(format!("{} notifications marked as seen", marked))),
    ))
}
