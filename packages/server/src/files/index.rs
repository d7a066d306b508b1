use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::error::FileError;
use crate::entity::file_record;

/// Fields of a record before the database assigns its id.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub student_id: Uuid,
    pub filename: String,
    pub size: i64,
    pub content_hash: String,
    pub location: String,
}

/// Append-only metadata index over the `file_record` table.
///
/// Every listing is ordered by id ascending, i.e. upload order.
pub struct FileIndex<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> FileIndex<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, record: NewFileRecord) -> Result<file_record::Model, FileError> {
        let model = file_record::ActiveModel {
            student_id: Set(record.student_id),
            filename: Set(record.filename),
            size: Set(record.size),
            content_hash: Set(record.content_hash),
            location: Set(record.location),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        Ok(model.insert(self.conn).await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<file_record::Model, FileError> {
        file_record::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| FileError::NotFound(format!("file {id}")))
    }

    pub async fn list_by_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<file_record::Model>, FileError> {
        Ok(file_record::Entity::find()
            .filter(file_record::Column::StudentId.eq(student_id))
            .order_by_asc(file_record::Column::Id)
            .all(self.conn)
            .await?)
    }

    pub async fn list_by_hash(&self, hash: &str) -> Result<Vec<file_record::Model>, FileError> {
        Ok(file_record::Entity::find()
            .filter(file_record::Column::ContentHash.eq(hash))
            .order_by_asc(file_record::Column::Id)
            .all(self.conn)
            .await?)
    }

    /// Every record in upload order.
    pub async fn scan(&self) -> Result<Vec<file_record::Model>, FileError> {
        Ok(file_record::Entity::find()
            .order_by_asc(file_record::Column::Id)
            .all(self.conn)
            .await?)
    }
}
