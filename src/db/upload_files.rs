//! Database operations for uploaded files and their rows.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde_json::Value as JsonValue;

use crate::entity::upload_file::{self, Entity as UploadFile};
use crate::entity::upload_row::{self, Entity as UploadRow};
use crate::error::{AppError, AppResult};
use crate::models::UploadFileStatus;

use super::DbPool;

/// Rows per INSERT statement.
const ROW_INSERT_CHUNK: usize = 500;

/// File metadata to insert.
#[derive(Debug, Clone)]
pub struct NewUploadFile {
    pub user_id: i64,
    pub batch_id: Option<i32>,
    pub filename: String,
    pub size_bytes: i64,
    pub content_sha256: String,
    pub skipped_rows: i32,
    pub status: UploadFileStatus,
}

/// A canonical row ready for storage.
#[derive(Debug, Clone)]
pub struct NewUploadRow {
    pub row_number: i32,
    pub data: JsonValue,
}

impl DbPool {
    /// Insert a file record and all of its rows in one transaction.
    pub async fn insert_upload_file(
        &self,
        file: NewUploadFile,
        rows: Vec<NewUploadRow>,
    ) -> AppResult<upload_file::Model> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let model = upload_file::ActiveModel {
            user_id: Set(file.user_id),
            batch_id: Set(file.batch_id),
            filename: Set(file.filename),
            size_bytes: Set(file.size_bytes),
            content_sha256: Set(file.content_sha256),
            row_count: Set(rows.len() as i32),
            skipped_rows: Set(file.skipped_rows),
            status: Set(file.status.as_str().to_string()),
            uploaded_at: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert upload file: {}", e)))?;

        for chunk in rows.chunks(ROW_INSERT_CHUNK) {
            let models = chunk.iter().map(|row| upload_row::ActiveModel {
                file_id: Set(inserted.id),
                row_number: Set(row.row_number),
                data: Set(row.data.clone()),
                ..Default::default()
            });

            UploadRow::insert_many(models)
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to insert upload rows: {}", e)))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit upload: {}", e)))?;

        Ok(inserted)
    }

    pub async fn get_upload_file(&self, id: i32) -> AppResult<Option<upload_file::Model>> {
        let result = UploadFile::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get upload file: {}", e)))?;

        Ok(result)
    }

    /// Files stored under a batch, in insertion order.
    pub async fn list_batch_files(&self, batch_id: i32) -> AppResult<Vec<upload_file::Model>> {
        let result = UploadFile::find()
            .filter(upload_file::Column::BatchId.eq(batch_id))
            .order_by_asc(upload_file::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list batch files: {}", e)))?;

        Ok(result)
    }

    /// Stored rows of a file, in file order.
    pub async fn list_upload_rows(&self, file_id: i32) -> AppResult<Vec<upload_row::Model>> {
        let result = UploadRow::find()
            .filter(upload_row::Column::FileId.eq(file_id))
            .order_by_asc(upload_row::Column::RowNumber)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list upload rows: {}", e)))?;

        Ok(result)
    }

    pub async fn count_upload_rows(&self, file_id: i32) -> AppResult<u64> {
        let count = UploadRow::find()
            .filter(upload_row::Column::FileId.eq(file_id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count upload rows: {}", e)))?;

        Ok(count)
    }
}
