use common::storage::{BlobStore, BoxReader};
use sea_orm::ConnectionTrait;
use tokio::io::AsyncRead;
use uuid::Uuid;

use super::error::FileError;
use super::index::{FileIndex, NewFileRecord};
use crate::entity::file_record;
use crate::utils::filename::validate_flat_filename;

/// What the caller knows about an upload before the bytes arrive.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Already authenticated by the caller.
    pub student_id: Uuid,
    pub filename: String,
    pub declared_size: u64,
}

/// Ties the blob store and the metadata index together.
///
/// An upload runs hash+stage, publish, then insert, strictly in that order,
/// so a record never points at a location without bytes and a failed or
/// cancelled upload never leaves a record behind.
pub struct FileService<'a, C: ConnectionTrait> {
    conn: &'a C,
    store: &'a dyn BlobStore,
}

impl<'a, C: ConnectionTrait> FileService<'a, C> {
    pub fn new(conn: &'a C, store: &'a dyn BlobStore) -> Self {
        Self { conn, store }
    }

    pub async fn upload(
        &self,
        request: UploadRequest,
        reader: &mut (dyn AsyncRead + Unpin + Send),
    ) -> Result<file_record::Model, FileError> {
        let filename = validate_flat_filename(&request.filename)
            .map_err(|e| FileError::InvalidFilename(e.message()))?
            .to_string();

        let stored = self
            .store
            .put_stream(reader, request.declared_size)
            .await?;

        FileIndex::new(self.conn)
            .insert(NewFileRecord {
                student_id: request.student_id,
                filename,
                size: i64::try_from(stored.size).unwrap_or(i64::MAX),
                content_hash: stored.hash.to_hex(),
                location: stored.location,
            })
            .await
    }

    pub async fn get(&self, id: i32) -> Result<file_record::Model, FileError> {
        FileIndex::new(self.conn).get_by_id(id).await
    }

    /// Open the blob behind a record for streaming.
    pub async fn open(&self, record: &file_record::Model) -> Result<(BoxReader, u64), FileError> {
        Ok(self.store.get_stream(&record.location).await?)
    }

    /// Read a whole file into memory. Bounded by the store's size limit.
    pub async fn read(&self, record: &file_record::Model) -> Result<Vec<u8>, FileError> {
        Ok(self.store.get(&record.location).await?)
    }

    pub async fn list_by_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<file_record::Model>, FileError> {
        FileIndex::new(self.conn).list_by_student(student_id).await
    }

    pub async fn list_by_hash(&self, hash: &str) -> Result<Vec<file_record::Model>, FileError> {
        FileIndex::new(self.conn).list_by_hash(hash).await
    }
}
