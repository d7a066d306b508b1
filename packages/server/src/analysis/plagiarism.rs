use std::collections::{HashMap, HashSet};

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entity::file_record;
use crate::files::{FileError, FileIndex};

/// Files sharing one content hash, uploaded by more than one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlagiarismGroup {
    pub hash: String,
    /// Ordered by id ascending.
    pub files: Vec<file_record::Model>,
    pub distinct_students: usize,
}

/// Cluster records by content hash and keep the clusters that span several
/// students.
///
/// Groups are sorted by distinct-student count, descending. Equal counts are
/// ordered by the smallest file id in the group, so the content that was
/// uploaded first comes first. Repeated uploads by a single student never form
/// a group on their own.
pub fn group_by_hash<I>(records: I) -> Vec<PlagiarismGroup>
where
    I: IntoIterator<Item = file_record::Model>,
{
    let mut partitions: HashMap<String, Vec<file_record::Model>> = HashMap::new();
    for record in records {
        partitions
            .entry(record.content_hash.clone())
            .or_default()
            .push(record);
    }

    let mut groups: Vec<PlagiarismGroup> = partitions
        .into_iter()
        .filter_map(|(hash, mut files)| {
            let distinct_students = files
                .iter()
                .map(|f| f.student_id)
                .collect::<HashSet<Uuid>>()
                .len();
            if distinct_students <= 1 {
                return None;
            }
            files.sort_by_key(|f| f.id);
            Some(PlagiarismGroup {
                hash,
                files,
                distinct_students,
            })
        })
        .collect();

    // Every retained group has at least two files, so `files[0]` exists.
    groups.sort_by(|a, b| {
        b.distinct_students
            .cmp(&a.distinct_students)
            .then_with(|| a.files[0].id.cmp(&b.files[0].id))
    });
    groups
}

/// Run the grouping over the whole index. Read-only; safe to call at any time.
pub async fn detect<C: ConnectionTrait>(conn: &C) -> Result<Vec<PlagiarismGroup>, FileError> {
    let records = FileIndex::new(conn).scan().await?;
    Ok(group_by_hash(records))
}
