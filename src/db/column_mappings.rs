//! Database operations for column mappings.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::column_mapping::{self, ActiveModel, Entity as ColumnMapping};
use crate::error::{AppError, AppResult};
use crate::models::NewColumnMapping;

use super::DbPool;

impl DbPool {
    /// Active mappings in creation order.
    pub async fn list_active_column_mappings(&self) -> AppResult<Vec<column_mapping::Model>> {
        let result = ColumnMapping::find()
            .filter(column_mapping::Column::Active.eq(true))
            .order_by_asc(column_mapping::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list active mappings: {}", e)))?;

        Ok(result)
    }

    /// All mappings, active or not.
    pub async fn list_column_mappings(&self) -> AppResult<Vec<column_mapping::Model>> {
        let result = ColumnMapping::find()
            .order_by_asc(column_mapping::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list mappings: {}", e)))?;

        Ok(result)
    }

    pub async fn get_column_mapping(&self, id: i32) -> AppResult<Option<column_mapping::Model>> {
        let result = ColumnMapping::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get mapping: {}", e)))?;

        Ok(result)
    }

    /// Insert a new active mapping.
    pub async fn insert_column_mapping(
        &self,
        mapping: NewColumnMapping,
    ) -> AppResult<column_mapping::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            source_column: Set(mapping.source_column),
            canonical_field: Set(mapping.canonical_field),
            field_type: Set(mapping.field_type.as_str().to_string()),
            required: Set(mapping.required),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert mapping: {}", e)))?;

        Ok(inserted)
    }

    /// Toggle a mapping. Returns false when the mapping does not exist.
    pub async fn set_column_mapping_active(&self, id: i32, active: bool) -> AppResult<bool> {
        let Some(existing) = self.get_column_mapping(id).await? else {
            return Ok(false);
        };

        let mut model: ActiveModel = existing.into();
        model.active = Set(active);
        model.updated_at = Set(Utc::now());
        model
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update mapping: {}", e)))?;

        Ok(true)
    }
}
