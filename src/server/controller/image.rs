use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, PageQuery},
        image::{OEmbedDto, PaginatedImagesDto},
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        service::{embed::EmbedService, image::ImageService},
        state::AppState,
    },
};

/// Tag for grouping image endpoints in OpenAPI documentation
pub static IMAGE_TAG: &str = "image";

/// List the logged in user's images, newest first.
#[utoipa::path(
    get,
    path = "/api/images",
    tag = IMAGE_TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "Page of images", body = PaginatedImagesDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_images(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let images = ImageService::new(&state.db, state.storage.as_ref(), &state.settings)
        .list_own(&user, query.page, query.per_page)
        .await?;

    Ok((StatusCode::OK, Json(images.into_dto())))
}

/// Delete one of the logged in user's images. Admins may delete any image.
#[utoipa::path(
    delete,
    path = "/api/images/{image_id}",
    tag = IMAGE_TAG,
    params(
        ("image_id" = String, Path, description = "Image ID")
    ),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Not the uploader", body = ErrorDto),
        (status = 404, description = "Image not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_image(
    State(state): State<AppState>,
    session: Session,
    Path(image_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ImageService::new(&state.db, state.storage.as_ref(), &state.settings)
        .delete(&user, &image_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// oEmbed description of an image, linked from its view page.
#[utoipa::path(
    get,
    path = "/api/images/{image_id}/oembed",
    tag = IMAGE_TAG,
    params(
        ("image_id" = String, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "oEmbed photo response", body = OEmbedDto),
        (status = 404, description = "Image not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_oembed(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let oembed = EmbedService::new(&state.db, state.storage.as_ref(), &state.settings)
        .oembed(&image_id)
        .await?;

    Ok((StatusCode::OK, Json(oembed)))
}

/// HTML view page for an image, carrying the uploader's embed metadata.
///
/// Accepts both URL styles, so invisible links resolve too.
#[utoipa::path(
    get,
    path = "/i/{slug}",
    tag = IMAGE_TAG,
    params(
        ("slug" = String, Path, description = "Image slug in either URL style")
    ),
    responses(
        (status = 200, description = "View page", content_type = "text/html"),
        (status = 404, description = "Image not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn view_image(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let page = EmbedService::new(&state.db, state.storage.as_ref(), &state.settings)
        .view_page(&slug)
        .await?;

    Ok(Html(page))
}

/// Raw image bytes with the stored content type.
#[utoipa::path(
    get,
    path = "/i/{slug}/raw",
    tag = IMAGE_TAG,
    params(
        ("slug" = String, Path, description = "Image slug in either URL style")
    ),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "Image not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn raw_image(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (image, bytes) = ImageService::new(&state.db, state.storage.as_ref(), &state.settings)
        .raw(&slug)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, image.mime_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
            // scripts inside SVG uploads must not run on our origin
            (
                header::CONTENT_SECURITY_POLICY,
                "default-src 'none'; style-src 'unsafe-inline'; sandbox".to_string(),
            ),
        ],
        bytes,
    ))
}
