//! Uploaded file entity: one record per successfully parsed file.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "upload_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i64,
    /// Set when the file arrived as part of a batch request
    pub batch_id: Option<i32>,
    pub filename: String,
    pub size_bytes: i64,
    pub content_sha256: String,
    pub row_count: i32,
    pub skipped_rows: i32,
    pub status: String,
    pub uploaded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::upload_batch::Entity",
        from = "Column::BatchId",
        to = "super::upload_batch::Column::Id",
        on_delete = "SetNull"
    )]
    Batch,
    #[sea_orm(has_many = "super::upload_row::Entity")]
    Rows,
}

impl Related<super::upload_batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl Related<super::upload_row::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
