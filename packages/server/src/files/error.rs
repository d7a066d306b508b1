use common::storage::StorageError;
use sea_orm::DbErr;
use thiserror::Error;

/// Failures of the upload/index/analysis core.
///
/// `Storage` and `Index` are infrastructure faults; callers decide whether to
/// retry. Everything else describes the request itself.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("declared size {declared} exceeds the limit of {limit} bytes")]
    Oversize { declared: u64, limit: u64 },

    #[error("declared {declared} bytes but received {actual}")]
    SizeMismatch { declared: u64, actual: u64 },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidFilename(&'static str),

    #[error("storage fault: {0}")]
    Storage(StorageError),

    #[error("index fault: {0}")]
    Index(#[from] DbErr),
}

impl From<StorageError> for FileError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeLimitExceeded { declared, limit } => {
                FileError::Oversize { declared, limit }
            }
            StorageError::SizeMismatch { declared, actual } => {
                FileError::SizeMismatch { declared, actual }
            }
            StorageError::NotFound(location) => FileError::NotFound(format!("blob {location}")),
            other => FileError::Storage(other),
        }
    }
}
