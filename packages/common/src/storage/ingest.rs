use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use super::error::StorageError;
use super::hash::ContentHash;

const READ_BUF_SIZE: usize = 64 * 1024;

/// A staging file that is removed when dropped.
///
/// Covers error paths and cancelled futures alike: whoever drops the guard
/// last cleans up, so no staged bytes outlive an ingest call.
#[derive(Debug)]
pub struct StagingFile {
    path: PathBuf,
}

impl StagingFile {
    fn new(staging_dir: &Path) -> Self {
        Self {
            path: staging_dir.join(uuid::Uuid::new_v4().to_string()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        // Drop cannot await, so this is a blocking unlink of a single file.
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Bytes that were hashed and written to a staging file, ready to publish.
#[derive(Debug)]
pub struct Staged {
    pub hash: ContentHash,
    pub size: u64,
    pub file: StagingFile,
}

/// Stream `reader` into a staging file under `staging_dir`, hashing as it goes.
///
/// The input is read exactly once and never buffered whole. Declared sizes
/// above `limit` are rejected before anything is created or read.
pub async fn stage<R>(
    reader: &mut R,
    declared_size: u64,
    limit: u64,
    staging_dir: &Path,
) -> Result<Staged, StorageError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    if declared_size > limit {
        return Err(StorageError::SizeLimitExceeded {
            declared: declared_size,
            limit,
        });
    }

    let staging = StagingFile::new(staging_dir);
    let mut file = fs::File::create(staging.path()).await?;
    let mut hasher = Sha256::new();
    let mut total: u64 = 0;
    let mut buf = vec![0u8; READ_BUF_SIZE];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }

        total += n as u64;
        if total > declared_size {
            // Stop pulling from a client that sends more than it announced.
            return Err(StorageError::SizeMismatch {
                declared: declared_size,
                actual: total,
            });
        }

        hasher.update(&buf[..n]);
        file.write_all(&buf[..n]).await?;
    }

    if total != declared_size {
        return Err(StorageError::SizeMismatch {
            declared: declared_size,
            actual: total,
        });
    }

    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    Ok(Staged {
        hash: ContentHash::from_bytes(hasher.finalize().into()),
        size: total,
        file: staging,
    })
}
