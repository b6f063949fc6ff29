//! Create upload_rows table.

use sea_orm_migration::prelude::*;

use super::m20251020_000003_create_upload_files::UploadFile;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UploadRow::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UploadRow::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UploadRow::FileId).integer().not_null())
                    .col(ColumnDef::new(UploadRow::RowNumber).integer().not_null())
                    .col(ColumnDef::new(UploadRow::Data).json().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(UploadRow::Table, UploadRow::FileId)
                            .to(UploadFile::Table, UploadFile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_upload_rows_file")
                    .table(UploadRow::Table)
                    .col(UploadRow::FileId)
                    .col(UploadRow::RowNumber)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UploadRow::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UploadRow {
    #[sea_orm(iden = "upload_rows")]
    Table,
    Id,
    FileId,
    RowNumber,
    Data,
}
