//! Upload row entity: a data row translated to canonical fields.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "upload_rows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub file_id: i32,
    /// Line number of the record in the source file (header is line 1)
    pub row_number: i32,
    #[sea_orm(column_type = "Json")]
    pub data: JsonValue,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::upload_file::Entity",
        from = "Column::FileId",
        to = "super::upload_file::Column::Id",
        on_delete = "Cascade"
    )]
    File,
}

impl Related<super::upload_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::File.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
