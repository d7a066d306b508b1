use std::sync::Arc;

use common::storage::BlobStore;
use sea_orm::DatabaseConnection;

use crate::analysis::WordCloudRenderer;
use crate::config::AppConfig;

/// Handles built once at start-up and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub blob_store: Arc<dyn BlobStore>,
    pub word_cloud: Arc<dyn WordCloudRenderer>,
}
