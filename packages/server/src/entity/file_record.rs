use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One upload event. Several records may point at the same blob.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file_record")]
pub struct Model {
    /// Assigned by the database, strictly increasing in upload order.
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub student_id: Uuid,

    /// Original upload filename.
    pub filename: String,

    pub size: i64,

    /// Lowercase hex SHA-256 of the content.
    #[sea_orm(indexed)]
    pub content_hash: String,

    /// Blob location relative to the storage root, derived from `content_hash`.
    pub location: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
