mod error;
mod hash;
mod traits;

pub mod filesystem;
pub mod ingest;

pub use error::StorageError;
pub use filesystem::FilesystemBlobStore;
pub use hash::{BLOB_EXTENSION, ContentHash, shard_location};
pub use traits::{BlobStore, BoxReader, StoredBlob};
