use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No user ID stored in the session.
    #[error("No user in session")]
    UserNotInSession,

    /// Session references a user ID that no longer exists.
    #[error("User {0} from session not found in database")]
    UserNotInDatabase(i32),

    /// Upload key header missing or not matching any user.
    #[error("Invalid upload key")]
    InvalidUploadKey,

    /// User lacks a required permission.
    ///
    /// # Fields
    /// - ID of the user
    /// - Description of what was attempted, for logs
    #[error("User {0} denied access: {1}")]
    AccessDenied(i32, String),

    /// Unknown login or wrong password; both produce the same error.
    #[error("Invalid login or password")]
    InvalidCredentials,

    /// Account was soft-deleted by an admin.
    #[error("Account {0} has been deleted")]
    AccountDeleted(i32),

    /// Operation requires a verified email address.
    #[error("User {0} has not verified their email")]
    EmailNotVerified(i32),

    /// Referral code unknown or belonging to a deleted user.
    #[error("Invalid referral code")]
    InvalidReferral,

    /// Referrer has used up their referral limit.
    #[error("Referral code has reached its usage limit")]
    ReferralLimitReached,

    /// Verification code or reset token unknown, expired or of the wrong kind.
    #[error("Invalid or expired verification code")]
    InvalidVerificationCode,
}

/// Converts authentication errors into HTTP responses.
///
/// Failures are logged at debug level. Client messages stay generic where more detail
/// would reveal whether an account exists.
///
/// # Returns
/// - 400 Bad Request - referral and verification code failures
/// - 401 Unauthorized - missing session, stale session user, bad credentials or upload key
/// - 403 Forbidden - access denied, deleted account, unverified email
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::UserNotInSession | Self::UserNotInDatabase(_) => {
                (StatusCode::UNAUTHORIZED, "You must be logged in")
            }
            Self::InvalidUploadKey => (StatusCode::UNAUTHORIZED, "Invalid upload key"),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid login or password"),
            Self::AccessDenied(_, _) => (
                StatusCode::FORBIDDEN,
                "You do not have permission to do that",
            ),
            Self::AccountDeleted(_) => (StatusCode::FORBIDDEN, "This account has been deleted"),
            Self::EmailNotVerified(_) => (
                StatusCode::FORBIDDEN,
                "Please verify your email address first",
            ),
            Self::InvalidReferral => (StatusCode::BAD_REQUEST, "Invalid referral code"),
            Self::ReferralLimitReached => (
                StatusCode::BAD_REQUEST,
                "This referral code has reached its usage limit",
            ),
            Self::InvalidVerificationCode => (
                StatusCode::BAD_REQUEST,
                "Invalid or expired verification code",
            ),
        };

        (status, Json(ErrorDto::new(message))).into_response()
    }
}
