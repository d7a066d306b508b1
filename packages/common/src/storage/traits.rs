use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::hash::ContentHash;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Outcome of a successful put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub hash: ContentHash,
    /// Relative location derived from `hash`.
    pub location: String,
    pub size: u64,
    /// `false` when identical content was already stored and nothing was written.
    pub created: bool,
}

/// Content-addressed blob storage.
///
/// After `put_stream` returns `Ok`, exactly one blob exists at the hash's
/// location whether this call created it or an earlier or concurrent one did.
/// Blobs are never overwritten or removed.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store an in-memory buffer.
    async fn put(&self, data: &[u8]) -> Result<StoredBlob, StorageError> {
        let mut reader = Cursor::new(data);
        self.put_stream(&mut reader, data.len() as u64).await
    }

    /// Hash and store exactly `declared_size` bytes from `reader`.
    async fn put_stream(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        declared_size: u64,
    ) -> Result<StoredBlob, StorageError>;

    /// Retrieve all bytes stored at `location`.
    async fn get(&self, location: &str) -> Result<Vec<u8>, StorageError> {
        let (mut reader, size) = self.get_stream(location).await?;
        let mut buf = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Open the blob at `location` for streaming, along with its size in bytes.
    async fn get_stream(&self, location: &str) -> Result<(BoxReader, u64), StorageError>;

    async fn exists(&self, location: &str) -> Result<bool, StorageError>;

    /// Largest declared size accepted by `put_stream`.
    fn max_size(&self) -> u64;
}
