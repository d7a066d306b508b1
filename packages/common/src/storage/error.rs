use std::fmt;

/// Errors that can occur during blob storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// No blob exists at the requested location.
    NotFound(String),
    /// An I/O error occurred (permissions, disk faults, ...).
    Io(std::io::Error),
    /// The provided content hash is invalid.
    InvalidHash(String),
    /// The location is not a relative path inside the storage root.
    InvalidLocation(String),
    /// The declared size exceeds the configured limit. Raised before any I/O.
    SizeLimitExceeded { declared: u64, limit: u64 },
    /// The stream delivered a different number of bytes than declared.
    SizeMismatch { declared: u64, actual: u64 },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(location) => write!(f, "blob not found: {location}"),
            Self::Io(err) => write!(f, "storage IO error: {err}"),
            Self::InvalidHash(msg) => write!(f, "invalid content hash: {msg}"),
            Self::InvalidLocation(location) => write!(f, "invalid blob location: {location}"),
            Self::SizeLimitExceeded { declared, limit } => {
                write!(f, "declared size exceeds limit ({declared} > {limit} bytes)")
            }
            Self::SizeMismatch { declared, actual } => {
                write!(f, "size mismatch: declared {declared} bytes, received {actual}")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
