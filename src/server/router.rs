use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    config::Settings,
    controller::{admin, auth, domain, image, upload, user},
    error::AppError,
    state::AppState,
};

/// Headroom on top of the file size limit for multipart boundaries and headers.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Seconds between refilled requests on the rate limited auth routes, per IP.
const AUTH_REPLENISH_SECONDS: u64 = 2;

/// Requests an IP may burst before auth routes start answering 429.
const AUTH_BURST: u32 = 10;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "imghost",
        description = "Invite-only image host with custom embeds and donated domains"
    ),
    tags(
        (name = "auth", description = "Registration, login and account recovery"),
        (name = "user", description = "Preferences, uploader configs, referrals and notifications"),
        (name = "upload", description = "Uploading images"),
        (name = "image", description = "Listing, viewing and deleting images"),
        (name = "domain", description = "Domain donations"),
        (name = "admin", description = "Back-office, admin only")
    )
)]
struct ApiDoc;

/// Builds the application router together with its OpenAPI document.
///
/// Endpoints that check a password or a code sit behind a per-IP rate limit, which
/// needs the server to be started with connect info. Swagger UI is served at
/// `/api/docs`.
pub fn router(settings: &Settings) -> Result<Router<AppState>, AppError> {
    let auth_limit = GovernorConfigBuilder::default()
        .per_second(AUTH_REPLENISH_SECONDS)
        .burst_size(AUTH_BURST)
        .finish()
        .ok_or_else(|| AppError::InternalError("Invalid rate limit configuration".to_string()))?;

    let rate_limited = rate_limited_routes().layer(GovernorLayer::new(Arc::new(auth_limit)));

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(rate_limited)
        .routes(routes!(auth::logout))
        .routes(routes!(auth::get_user))
        .routes(routes!(user::get_preferences, user::update_preferences))
        .routes(routes!(user::regenerate_upload_key))
        .routes(routes!(user::sharex_config))
        .routes(routes!(user::sharenix_config))
        .routes(routes!(user::get_referrals))
        .routes(routes!(user::get_notifications))
        .routes(routes!(user::mark_notification_seen))
        .routes(routes!(user::mark_all_notifications_seen))
        .routes(routes!(upload::upload))
        .routes(routes!(image::get_images))
        .routes(routes!(image::delete_image))
        .routes(routes!(image::get_oembed))
        .routes(routes!(image::view_image))
        .routes(routes!(image::raw_image))
        .routes(routes!(domain::add_domain, domain::get_available_domains))
        .routes(routes!(domain::get_own_domains))
        .routes(routes!(domain::submit_domain))
        .routes(routes!(domain::check_domain))
        .routes(routes!(domain::delete_domain))
        .routes(routes!(admin::get_users))
        .routes(routes!(admin::update_user, admin::delete_user))
        .routes(routes!(admin::restore_user))
        .routes(routes!(admin::grant_badge))
        .routes(routes!(admin::revoke_badge))
        .routes(routes!(admin::send_notification))
        .routes(routes!(admin::get_images))
        .routes(routes!(admin::delete_image))
        .routes(routes!(admin::get_domains))
        .routes(routes!(admin::update_domain, admin::delete_domain))
        .routes(routes!(admin::get_logs, admin::clear_logs))
        .routes(routes!(admin::get_stats))
        .split_for_parts();

    let body_limit = usize::try_from(settings.max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Ok(router
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http()))
}

/// Endpoints that accept a password, a verification code or a reset token.
fn rate_limited_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::request_password_reset))
        .routes(routes!(auth::reset_password))
        .routes(routes!(auth::verify_email))
        .routes(routes!(auth::resend_verification))
        .routes(routes!(auth::change_password))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that every endpoint taking a guessable secret is rate limited.
    ///
    /// Expected: login, registration, reset and email code paths all present
    #[test]
    fn secret_checking_routes_are_rate_limited() {
        let (_, api) = rate_limited_routes().split_for_parts();

        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/password/forgot",
            "/api/auth/password/reset",
            "/api/auth/verify",
            "/api/auth/verify/resend",
            "/api/auth/password",
        ] {
            assert!(api.paths.paths.contains_key(path), "{} is not rate limited", path);
        }
    }

    /// Tests that the full router builds with the default settings.
    ///
    /// Expected: Ok
    #[test]
    fn builds_router() {
        assert!(router(&Settings::for_tests()).is_ok());
    }
}
