use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        user::{
            ChangePasswordDto, LoginDto, PasswordResetDto, PasswordResetRequestDto, RegisterDto,
            UserDto, VerifyEmailDto,
        },
    },
    server::{
        error::AppError,
        middleware::{auth::AuthGuard, session::AuthSession},
        model::user::RegisterParam,
        service::{auth::AuthService, user::UserService, verification::VerificationService},
        state::AppState,
    },
};

/// Tag for grouping auth endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

/// Register a new account.
///
/// Requires the referral code of an existing user, or the one-time setup code
/// printed at startup which makes the new account an admin. The new user is
/// logged in right away and sent an email verification code.
///
/// # Returns
/// - `201 Created` - Account created and logged in
/// - `400 Bad Request` - Invalid input or referral code
/// - `409 Conflict` - Username or email already taken
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = UserDto),
        (status = 400, description = "Invalid input or referral code", body = ErrorDto),
        (status = 409, description = "Username or email taken", body = ErrorDto),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterDto>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::new(
        &state.db,
        state.mailer.as_ref(),
        &state.setup_code_service,
        &state.settings,
    );

    let user = service.register(RegisterParam::from_dto(payload)).await?;

    AuthSession::new(&session).set_user_id(user.id).await?;

    let profile = UserService::new(&state.db).profile(user).await?;

    Ok((StatusCode::CREATED, Json(profile.into_dto())))
}

/// Log in with username or email and password.
///
/// # Returns
/// - `200 OK` - Logged in
/// - `401 Unauthorized` - Unknown login or wrong password
/// - `403 Forbidden` - Account deleted
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = UserDto),
        (status = 401, description = "Invalid login or password", body = ErrorDto),
        (status = 403, description = "Account deleted", body = ErrorDto),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginDto>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::new(
        &state.db,
        state.mailer.as_ref(),
        &state.setup_code_service,
        &state.settings,
    );

    let user = service.login(&payload.login, &payload.password).await?;

    AuthSession::new(&session).set_user_id(user.id).await?;

    let profile = UserService::new(&state.db).profile(user).await?;

    Ok((StatusCode::OK, Json(profile.into_dto())))
}

/// Log out by clearing the session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged out", body = MessageDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    AuthSession::new(&session).clear().await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Logged out"))))
}

/// Get the currently logged in user, including badges.
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let profile = UserService::new(&state.db).profile(user).await?;

    Ok((StatusCode::OK, Json(profile.into_dto())))
}

/// Verify the email address with the code that was mailed at registration.
#[utoipa::path(
    post,
    path = "/api/auth/verify",
    tag = AUTH_TAG,
    request_body = VerifyEmailDto,
    responses(
        (status = 200, description = "Email verified", body = MessageDto),
        (status = 400, description = "Invalid or expired code, or already verified", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn verify_email(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<VerifyEmailDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    VerificationService::new(&state.db, state.mailer.as_ref(), &state.settings)
        .verify_email(&user, payload.code.trim())
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Email verified"))))
}

/// Send a fresh email verification code, replacing the previous one.
#[utoipa::path(
    post,
    path = "/api/auth/verify/resend",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Code sent", body = MessageDto),
        (status = 400, description = "Email already verified", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 502, description = "Mail provider failed", body = ErrorDto)
    ),
)]
pub async fn resend_verification(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    VerificationService::new(&state.db, state.mailer.as_ref(), &state.settings)
        .resend_email_code(&user)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new("Verification code sent")),
    ))
}

/// Request a password reset link.
///
/// Always answers the same way so the response does not reveal whether an
/// account exists for the address.
#[utoipa::path(
    post,
    path = "/api/auth/password/forgot",
    tag = AUTH_TAG,
    request_body = PasswordResetRequestDto,
    responses(
        (status = 200, description = "Reset link sent if the account exists", body = MessageDto),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    VerificationService::new(&state.db, state.mailer.as_ref(), &state.settings)
        .request_password_reset(&payload.email)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new(
            "If an account exists for that address, a reset link has been sent",
        )),
    ))
}

/// Set a new password using a reset token.
#[utoipa::path(
    post,
    path = "/api/auth/password/reset",
    tag = AUTH_TAG,
    request_body = PasswordResetDto,
    responses(
        (status = 200, description = "Password changed", body = MessageDto),
        (status = 400, description = "Invalid token or password", body = ErrorDto),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetDto>,
) -> Result<impl IntoResponse, AppError> {
    VerificationService::new(&state.db, state.mailer.as_ref(), &state.settings)
        .reset_password(payload.token.trim(), &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Password changed"))))
}

/// Change the password of the logged in user.
#[utoipa::path(
    put,
    path = "/api/auth/password",
    tag = AUTH_TAG,
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageDto),
        (status = 400, description = "New password invalid", body = ErrorDto),
        (status = 401, description = "Not logged in or current password wrong", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ChangePasswordDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    AuthService::new(
        &state.db,
        state.mailer.as_ref(),
        &state.setup_code_service,
        &state.settings,
    )
    .change_password(&user, &payload.current_password, &payload.new_password)
    .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Password changed"))))
}
