use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        media::{MediaDto, MediaOwnerType, MediaQuery, MediaUploadForm},
        user::Role,
    },
    server::{
        controller::util::{get_user::require_role, multipart::MultipartForm},
        error::Error,
        model::app::AppState,
        service::media::MediaService,
    },
};

pub static MEDIA_TAG: &str = "media";

/// Upload images for a property, unit, booking or checkout report
///
/// JPEG and PNG images larger than 1920x1920 are downscaled. Either every file is stored or
/// none is.
#[utoipa::path(
    post,
    path = "/api/media",
    tag = MEDIA_TAG,
    request_body(content = MediaUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Files stored", body = Vec<MediaDto>),
        (status = 400, description = "Missing owner, no files or a rejected file", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Owner not found", body = ErrorDto),
        (status = 413, description = "Request body too large", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn upload_media(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let form = MultipartForm::read(multipart, "files").await?;
    let owner_type: MediaOwnerType = form.parse("owner_type")?;
    let owner_id: i32 = form.parse("owner_id")?;

    let media = MediaService::new(&state.db, &state.storage)
        .upload(
            owner_type,
            owner_id,
            form.files,
            state.config.media_max_upload_bytes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(media)))
}

/// List the media of an owner, oldest first
#[utoipa::path(
    get,
    path = "/api/media",
    tag = MEDIA_TAG,
    params(MediaQuery),
    responses(
        (status = 200, description = "Media of the owner", body = Vec<MediaDto>),
        (status = 400, description = "Missing or invalid owner", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_media(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MediaQuery>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let media = MediaService::new(&state.db, &state.storage)
        .list(query.owner_type, query.owner_id)
        .await?;

    Ok((StatusCode::OK, Json(media)))
}

#[utoipa::path(
    get,
    path = "/api/media/{id}",
    tag = MEDIA_TAG,
    params(("id" = i32, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media found", body = MediaDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Media not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_media(
    State(state): State<AppState>,
    session: Session,
    Path(media_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let media = MediaService::new(&state.db, &state.storage)
        .get(media_id)
        .await?;

    Ok((StatusCode::OK, Json(media)))
}

/// Download the stored file with its content type
#[utoipa::path(
    get,
    path = "/api/media/{id}/file",
    tag = MEDIA_TAG,
    params(("id" = i32, Path, description = "Media ID")),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Media or stored file not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn download_media(
    State(state): State<AppState>,
    session: Session,
    Path(media_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let (media, bytes) = MediaService::new(&state.db, &state.storage)
        .download(media_id)
        .await?;

    let disposition = format!(
        "inline; filename=\"{}\"",
        media.file_name.replace(['"', '\\'], "_")
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, media.mime_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// Delete media and its stored file
#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    tag = MEDIA_TAG,
    params(("id" = i32, Path, description = "Media ID")),
    responses(
        (status = 204, description = "Media deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Media not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_media(
    State(state): State<AppState>,
    session: Session,
    Path(media_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    MediaService::new(&state.db, &state.storage)
        .delete(media_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
