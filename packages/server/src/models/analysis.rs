use serde::Serialize;

use super::file::FileResponse;
use crate::analysis::PlagiarismGroup;

/// Files with identical content submitted by different students.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PlagiarismGroupResponse {
    /// Shared content hash.
    pub hash: String,
    /// Number of distinct students in the group (always at least 2).
    #[schema(example = 2)]
    pub count: usize,
    pub files: Vec<FileResponse>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PlagiarismReport {
    /// Sorted by `count` descending, then by first upload.
    pub groups: Vec<PlagiarismGroupResponse>,
    pub total: u64,
}

impl From<PlagiarismGroup> for PlagiarismGroupResponse {
    fn from(group: PlagiarismGroup) -> Self {
        Self {
            hash: group.hash,
            count: group.distinct_students,
            files: group.files.into_iter().map(FileResponse::from).collect(),
        }
    }
}

impl From<Vec<PlagiarismGroup>> for PlagiarismReport {
    fn from(groups: Vec<PlagiarismGroup>) -> Self {
        let total = groups.len() as u64;
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
            total,
        }
    }
}
