use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, body::Body};
use common::storage::ContentHash;
use futures::TryStreamExt;
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entity::file_record;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::files::{FileService, UploadRequest};
use crate::models::file::{FileListResponse, FileResponse};
use crate::state::AppState;
use crate::utils::filename::attachment_disposition;
use crate::utils::jwt::Role;

/// Room for multipart framing and the `size` field on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn upload_body_limit(max_file_size: u64) -> DefaultBodyLimit {
    let max_file_size = usize::try_from(max_file_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max_file_size.saturating_add(MULTIPART_OVERHEAD))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Files",
    operation_id = "uploadFile",
    summary = "Upload a submission",
    description = "Streams one file into content-addressed storage and records the upload. \
        Send a `size` field with the exact byte count before the `file` field; if it is absent \
        the file part's own Content-Length header is used. Identical content is stored once, \
        but every upload gets its own record. Fields after the first `file` are ignored.",
    request_body(content_type = "multipart/form-data", description = "`size` then `file`"),
    responses(
        (status = 201, description = "File recorded", body = FileResponse),
        (status = 400, description = "Bad form, filename, or size mismatch (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Only students upload (PERMISSION_DENIED)", body = ErrorBody),
        (status = 413, description = "Declared size over the limit (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(student_id = %auth_user.user_id))]
pub async fn upload_file(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(Role::Student)?;

    let mut declared_size: Option<u64> = None;
    let mut uploaded: Option<file_record::Model> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("size") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read size: {e}")))?;
                let size = text.trim().parse::<u64>().map_err(|_| {
                    AppError::Validation("'size' must be a non-negative integer".into())
                })?;
                declared_size = Some(size);
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(str::to_owned)
                    .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
                let declared_size = declared_size
                    .or_else(|| part_content_length(field.headers()))
                    .ok_or_else(|| {
                        AppError::Validation(
                            "Declared size required: send a 'size' field before 'file'".into(),
                        )
                    })?;

                let mut reader = StreamReader::new(Box::pin(field.map_err(std::io::Error::other)));
                let request = UploadRequest {
                    student_id: auth_user.user_id,
                    filename,
                    declared_size,
                };
                let record = FileService::new(&state.db, &*state.blob_store)
                    .upload(request, &mut reader)
                    .await?;
                // Committed. Anything after the first file is ignored.
                uploaded = Some(record);
                break;
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let record = uploaded.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    info!(
        file_id = record.id,
        content_hash = %record.content_hash,
        size = record.size,
        "File uploaded"
    );

    Ok((StatusCode::CREATED, Json(FileResponse::from(record))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Files",
    operation_id = "downloadFile",
    summary = "Download a submission",
    description = "Streams the stored bytes. Students may download their own files; teachers \
        may download any file. Supports ETag-based caching via If-None-Match.",
    params(("id" = i32, Path, description = "File ID")),
    responses(
        (status = 200, description = "File content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, headers), fields(file_id = id))]
pub async fn download_file(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let service = FileService::new(&state.db, &*state.blob_store);
    let record = service.get(id).await?;
    auth_user.require_owner_or_teacher(record.student_id)?;

    let etag_value = format!("\"{}\"", record.content_hash);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let (reader, size) = service.open(&record).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&record.filename),
        )
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

#[utoipa::path(
    get,
    path = "/hash/{hash}",
    tag = "Files",
    operation_id = "listFilesByHash",
    summary = "List uploads with a given content hash",
    params(("hash" = String, Path, description = "Lowercase hex SHA-256")),
    responses(
        (status = 200, description = "Uploads in id order; empty if none", body = FileListResponse),
        (status = 400, description = "Malformed hash (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Teachers only (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_files_by_hash(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<FileListResponse>, AppError> {
    auth_user.require_role(Role::Teacher)?;

    let hash = ContentHash::from_hex(&hash.to_ascii_lowercase())
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let files = FileService::new(&state.db, &*state.blob_store)
        .list_by_hash(&hash.to_hex())
        .await?;

    Ok(Json(FileListResponse::from(files)))
}

#[utoipa::path(
    get,
    path = "/{student_id}/files",
    tag = "Students",
    operation_id = "listStudentFiles",
    summary = "List a student's uploads",
    description = "Students may list their own uploads; teachers may list anyone's.",
    params(("student_id" = String, Path, description = "Student UUID")),
    responses(
        (status = 200, description = "Uploads in id order; empty if none", body = FileListResponse),
        (status = 400, description = "Malformed student ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not this student (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_student_files(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<FileListResponse>, AppError> {
    let student_id = Uuid::parse_str(&student_id)
        .map_err(|_| AppError::Validation("Invalid student ID".into()))?;
    auth_user.require_owner_or_teacher(student_id)?;

    let files = FileService::new(&state.db, &*state.blob_store)
        .list_by_student(student_id)
        .await?;

    Ok(Json(FileListResponse::from(files)))
}

fn part_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
