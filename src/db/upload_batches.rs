//! Database operations for upload batches.
//!
//! A batch row is created before its files are processed and its counters
//! are written once, by the same request, when processing ends.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use crate::entity::upload_batch::{self, ActiveModel, Entity as UploadBatch};
use crate::error::{AppError, AppResult};
use crate::models::BatchStatus;

use super::DbPool;

impl DbPool {
    /// Create a batch in `processing` state with zeroed counters.
    pub async fn create_upload_batch(
        &self,
        user_id: i64,
        batch_name: Option<String>,
    ) -> AppResult<upload_batch::Model> {
        let model = ActiveModel {
            user_id: Set(user_id),
            batch_name: Set(batch_name),
            successful_files: Set(0),
            failed_files: Set(0),
            status: Set(BatchStatus::Processing.as_str().to_string()),
            created_at: Set(Utc::now()),
            completed_at: Set(None),
            ..Default::default()
        };

        let inserted = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to create upload batch: {}", e)))?;

        Ok(inserted)
    }

    /// Write final counters and mark the batch completed.
    pub async fn finalize_upload_batch(
        &self,
        batch: upload_batch::Model,
        successful_files: i32,
        failed_files: i32,
    ) -> AppResult<upload_batch::Model> {
        let mut model: ActiveModel = batch.into();
        model.successful_files = Set(successful_files);
        model.failed_files = Set(failed_files);
        model.status = Set(BatchStatus::Completed.as_str().to_string());
        model.completed_at = Set(Some(Utc::now()));

        let updated = model
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to finalize upload batch: {}", e)))?;

        Ok(updated)
    }

    pub async fn get_upload_batch(&self, id: i32) -> AppResult<Option<upload_batch::Model>> {
        let result = UploadBatch::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get upload batch: {}", e)))?;

        Ok(result)
    }
}
