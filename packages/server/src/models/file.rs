use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::file_record;

/// Public view of an upload. The storage location stays internal.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FileResponse {
    #[schema(example = 42)]
    pub id: i32,
    pub student_id: Uuid,
    #[schema(example = "essay.txt")]
    pub filename: String,
    /// Size in bytes.
    #[schema(example = 2048)]
    pub size: i64,
    /// Lowercase hex SHA-256 of the content.
    #[schema(example = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")]
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FileListResponse {
    /// Ordered by id ascending (upload order).
    pub files: Vec<FileResponse>,
    pub total: u64,
}

impl From<file_record::Model> for FileResponse {
    fn from(model: file_record::Model) -> Self {
        Self {
            id: model.id,
            student_id: model.student_id,
            filename: model.filename,
            size: model.size,
            content_hash: model.content_hash,
            created_at: model.created_at,
        }
    }
}

impl From<Vec<file_record::Model>> for FileListResponse {
    fn from(models: Vec<file_record::Model>) -> Self {
        let total = models.len() as u64;
        Self {
            files: models.into_iter().map(FileResponse::from).collect(),
            total,
        }
    }
}
