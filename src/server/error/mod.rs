//! Error types and HTTP response handling.
//!
//! This module provides the application's error hierarchy and conversion logic for
//! transforming errors into appropriate HTTP responses. The `AppError` enum serves
//! as the top-level error type that wraps domain-specific errors and implements
//! `IntoResponse` for automatic error handling in API endpoints.

pub mod auth;
pub mod config;
pub mod internal;
pub mod provider;
pub mod storage;
pub mod validation;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        auth::AuthError, config::ConfigError, internal::InternalError, provider::ProviderError,
        storage::StorageError, validation::ValidationError,
    },
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application and provides
/// automatic conversion to HTTP responses. Most variants use `#[from]` for automatic
/// error conversion. Domain-specific errors like `AuthError` handle their own response
/// mapping, while generic variants provide standard HTTP status codes.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Authentication or authorization error.
    ///
    /// Delegates to `AuthError::into_response()` for custom status code mapping.
    #[error(transparent)]
    AuthErr(#[from] AuthError),

    /// Rejected user input. Results in 400 Bad Request naming the field.
    #[error(transparent)]
    ValidationErr(#[from] ValidationError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// SQLx driver error, raised by the session store setup.
    #[error(transparent)]
    SqlxErr(#[from] sea_orm::SqlxError),

    /// Session store operation error.
    #[error(transparent)]
    SessionErr(#[from] tower_sessions::session::Error),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Object store error. Missing objects map to 404, everything else to 500.
    #[error(transparent)]
    StorageErr(#[from] StorageError),

    /// Third-party provider failure. Results in 502 Bad Gateway.
    #[error(transparent)]
    ProviderErr(#[from] ProviderError),

    /// Malformed or oversized multipart upload body.
    ///
    /// Answers with the status axum attaches, e.g. 413 once the body limit is hit.
    #[error(transparent)]
    MultipartErr(#[from] axum::extract::multipart::MultipartError),

    /// Unexpected internal failure. Results in 500 with a generic message.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Server socket or other IO failure during startup.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    /// Resource not found error.
    ///
    /// Results in 404 Not Found with the provided error message.
    #[error("{0}")]
    NotFound(String),

    /// Invalid request error.
    ///
    /// Results in 400 Bad Request with the provided error message.
    #[error("{0}")]
    BadRequest(String),

    /// Request conflicts with existing state, e.g. a duplicate username or domain.
    ///
    /// Results in 409 Conflict with the provided error message.
    #[error("{0}")]
    Conflict(String),

    /// Upload exceeds the size limit or the user's storage quota.
    ///
    /// Results in 413 Payload Too Large with the provided error message.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Internal server error with custom message.
    ///
    /// Results in 500 Internal Server Error. The provided message is logged
    /// but a generic message is returned to the client.
    #[error("{0}")]
    InternalError(String),
}

/// Converts application errors into HTTP responses.
///
/// Maps each error variant to an appropriate HTTP status code and response body.
/// Authentication errors delegate to their own response handling, while other errors
/// use standard mappings. Internal errors are logged with full details but return
/// generic messages to avoid information leakage.
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::AuthErr(err) => err.into_response(),
            Self::ValidationErr(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorDto {
                    error: err.message,
                    field: Some(err.field.to_string()),
                }),
            )
                .into_response(),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, Json(ErrorDto::new(msg))).into_response(),
            Self::StorageErr(StorageError::NotFound(key)) => {
                tracing::warn!("Stored object missing: {}", key);
                (StatusCode::NOT_FOUND, Json(ErrorDto::new("File not found"))).into_response()
            }
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorDto::new(msg))).into_response()
            }
            Self::MultipartErr(err) => {
                (err.status(), Json(ErrorDto::new(err.body_text()))).into_response()
            }
            Self::Conflict(msg) => (StatusCode::CONFLICT, Json(ErrorDto::new(msg))).into_response(),
            Self::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, Json(ErrorDto::new(msg))).into_response()
            }
            Self::ProviderErr(err) => {
                tracing::error!("{}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorDto::new("An upstream service failed, please try again later")),
                )
                    .into_response()
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDto::new("Internal server error")),
                )
                    .into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic "Internal server error" body so
/// implementation details never reach the client.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto::new("Internal server error")),
        )
            .into_response()
    }
}
