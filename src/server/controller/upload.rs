use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{api::ErrorDto, image::ImageDto},
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        service::{
            link::LinkService,
            upload::{UploadParam, UploadService},
        },
        state::AppState,
    },
};

/// Tag for grouping upload endpoints in OpenAPI documentation
pub static UPLOAD_TAG: &str = "upload";

/// Multipart field carrying the file.
const FILE_FIELD: &str = "file";

/// Upload an image.
///
/// Accepts a multipart body with the image in the `file` field. Upload clients
/// authenticate with the upload key in the `Authorization` header; the web UI
/// uses its session instead. The response carries the share, raw and delete
/// links, which ShareX reads through `{json:url}` and `{json:delete_url}`.
///
/// # Returns
/// - `201 Created` - Image stored
/// - `400 Bad Request` - Missing file or unsupported type
/// - `401 Unauthorized` - Invalid upload key or not logged in
/// - `403 Forbidden` - Email not verified
/// - `413 Payload Too Large` - File too large or quota exceeded
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = UPLOAD_TAG,
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field"),
    params(
        ("Authorization" = Option<String>, Header, description = "Upload key")
    ),
    responses(
        (status = 201, description = "Image stored", body = ImageDto),
        (status = 400, description = "Missing file or unsupported type", body = ErrorDto),
        (status = 401, description = "Invalid upload key or not logged in", body = ErrorDto),
        (status = 403, description = "Email not verified", body = ErrorDto),
        (status = 413, description = "File too large or quota exceeded", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn upload(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let user = AuthGuard::new(&state.db, &session)
        .require_uploader(authorization)
        .await?;

    let mut param = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        param = Some(UploadParam {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    let Some(param) = param else {
        return Err(AppError::BadRequest(format!(
            "Missing multipart field '{}'",
            FILE_FIELD
        )));
    };

    let image = UploadService::new(&state.db, state.storage.as_ref(), &state.settings)
        .upload(&user, param)
        .await?;
    let links = LinkService::new(&state.db, &state.settings)
        .image_links(&user, &image)
        .await?;

    Ok((StatusCode::CREATED, Json(image.into_dto(links))))
}
