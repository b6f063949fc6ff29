//! Lookups used by the reporting pages: a user's most recent upload.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entity::upload_batch::{self, Entity as UploadBatch};
use crate::entity::upload_file::{self, Entity as UploadFile};
use crate::error::{AppError, AppResult};
use crate::models::LatestUpload;

use super::DbPool;

impl DbPool {
    /// Most recently created batch for the user.
    pub async fn get_latest_batch_id(&self, user_id: i64) -> AppResult<Option<i32>> {
        let result = UploadBatch::find()
            .select_only()
            .column(upload_batch::Column::Id)
            .filter(upload_batch::Column::UserId.eq(user_id))
            .order_by_desc(upload_batch::Column::CreatedAt)
            .order_by_desc(upload_batch::Column::Id)
            .into_tuple::<i32>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get latest batch: {}", e)))?;

        Ok(result)
    }

    /// Most recently uploaded file for the user.
    pub async fn get_latest_file_id(&self, user_id: i64) -> AppResult<Option<i32>> {
        let result = UploadFile::find()
            .select_only()
            .column(upload_file::Column::Id)
            .filter(upload_file::Column::UserId.eq(user_id))
            .order_by_desc(upload_file::Column::UploadedAt)
            .order_by_desc(upload_file::Column::Id)
            .into_tuple::<i32>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get latest file: {}", e)))?;

        Ok(result)
    }

    /// Latest upload, a batch taking priority over a lone file.
    pub async fn get_latest_upload(&self, user_id: i64) -> AppResult<Option<LatestUpload>> {
        if let Some(batch_id) = self.get_latest_batch_id(user_id).await? {
            return Ok(Some(LatestUpload::Batch(batch_id)));
        }

        Ok(self
            .get_latest_file_id(user_id)
            .await?
            .map(LatestUpload::File))
    }
}
