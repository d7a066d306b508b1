use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncRead, BufReader};

use super::error::StorageError;
use super::ingest::{self, Staged};
use super::traits::{BlobStore, BoxReader, StoredBlob};

const STAGING_DIR: &str = ".tmp";

/// Filesystem-backed content-addressed blob store.
///
/// Blobs live at `{root}/{hash[0..2]}/{hash[2..4]}/{hash}.dat`. Uploads are
/// staged under `{root}/.tmp` and published with a hard link, which creates
/// the final name atomically and refuses to replace an existing one. Staging
/// inside the root keeps both paths on the same filesystem.
pub struct FilesystemBlobStore {
    root: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub async fn new(root: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(STAGING_DIR)).await?;
        Ok(Self { root, max_size })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    /// Resolve a relative location under the root, refusing anything that
    /// could escape it.
    fn resolve(&self, location: &str) -> Result<PathBuf, StorageError> {
        let mut path = self.root.clone();
        let mut parts = 0;
        for part in location.split('/') {
            match Path::new(part).components().next() {
                Some(Component::Normal(_)) if Path::new(part).components().count() == 1 => {
                    path.push(part);
                    parts += 1;
                }
                _ => return Err(StorageError::InvalidLocation(location.to_string())),
            }
        }
        if parts == 0 || location.split('/').next() == Some(STAGING_DIR) {
            return Err(StorageError::InvalidLocation(location.to_string()));
        }
        Ok(path)
    }

    /// Move staged bytes to their final location.
    async fn publish(&self, staged: Staged) -> Result<StoredBlob, StorageError> {
        let location = staged.hash.location();
        let blob_path = self.resolve(&location)?;

        if let Some(parent) = blob_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let created = match fs::hard_link(staged.file.path(), &blob_path).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => false,
            Err(e) => return Err(e.into()),
        };

        // The staging name is unlinked when `staged` drops.
        Ok(StoredBlob {
            hash: staged.hash,
            location,
            size: staged.size,
            created,
        })
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put_stream(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        declared_size: u64,
    ) -> Result<StoredBlob, StorageError> {
        let staged =
            ingest::stage(reader, declared_size, self.max_size, &self.staging_dir()).await?;
        self.publish(staged).await
    }

    async fn get_stream(&self, location: &str) -> Result<(BoxReader, u64), StorageError> {
        let blob_path = self.resolve(location)?;
        let file = match fs::File::open(&blob_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(location.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let size = file.metadata().await?.len();
        Ok((Box::new(BufReader::new(file)), size))
    }

    async fn exists(&self, location: &str) -> Result<bool, StorageError> {
        let blob_path = self.resolve(location)?;
        Ok(fs::try_exists(&blob_path).await?)
    }

    fn max_size(&self) -> u64 {
        self.max_size
    }
}
