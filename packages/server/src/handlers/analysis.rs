use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use tracing::{info, instrument};

use crate::analysis;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::files::FileService;
use crate::models::analysis::PlagiarismReport;
use crate::state::AppState;
use crate::utils::jwt::Role;

#[utoipa::path(
    get,
    path = "/plagiarism",
    tag = "Analysis",
    operation_id = "checkPlagiarism",
    summary = "Find identical submissions",
    description = "Groups every upload by content hash and returns the groups shared by more \
        than one distinct student, largest first. Ties go to the group whose earliest upload \
        came first. A student re-uploading their own file never forms a group.",
    responses(
        (status = 200, description = "Plagiarism report", body = PlagiarismReport),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Teachers only (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(teacher_id = %auth_user.user_id))]
pub async fn check_plagiarism(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<PlagiarismReport>, AppError> {
    auth_user.require_role(Role::Teacher)?;

    let groups = analysis::detect(&state.db).await?;
    info!(groups = groups.len(), "Plagiarism check complete");

    Ok(Json(PlagiarismReport::from(groups)))
}

#[utoipa::path(
    get,
    path = "/wordcloud/{id}",
    tag = "Analysis",
    operation_id = "renderWordCloud",
    summary = "Render a word cloud for a submission",
    description = "Reads the stored file as text (invalid UTF-8 is replaced) and asks the \
        configured chart service for a PNG word cloud.",
    params(("id" = i32, Path, description = "File ID")),
    responses(
        (status = 200, description = "PNG image", content_type = "image/png"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Teachers only (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Chart service failed (UPSTREAM_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(file_id = id))]
pub async fn word_cloud(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(Role::Teacher)?;

    let service = FileService::new(&state.db, &*state.blob_store);
    let record = service.get(id).await?;
    let bytes = service.read(&record).await?;
    let text = String::from_utf8_lossy(&bytes);

    let png = state.word_cloud.render(&text).await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
