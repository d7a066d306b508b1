pub mod error;
pub mod index;
pub mod service;

pub use error::FileError;
pub use index::{FileIndex, NewFileRecord};
pub use service::{FileService, UploadRequest};
