//! Create upload_files table.

use sea_orm_migration::prelude::*;

use super::m20251020_000002_create_upload_batches::UploadBatch;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UploadFile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UploadFile::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UploadFile::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UploadFile::BatchId).integer())
                    .col(ColumnDef::new(UploadFile::Filename).string_len(255).not_null())
                    .col(ColumnDef::new(UploadFile::SizeBytes).big_integer().not_null())
                    .col(
                        ColumnDef::new(UploadFile::ContentSha256)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UploadFile::RowCount).integer().not_null())
                    .col(
                        ColumnDef::new(UploadFile::SkippedRows)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UploadFile::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(UploadFile::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UploadFile::Table, UploadFile::BatchId)
                            .to(UploadBatch::Table, UploadBatch::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_upload_files_user_uploaded")
                    .table(UploadFile::Table)
                    .col(UploadFile::UserId)
                    .col(UploadFile::UploadedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_upload_files_batch")
                    .table(UploadFile::Table)
                    .col(UploadFile::BatchId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UploadFile::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UploadFile {
    #[sea_orm(iden = "upload_files")]
    Table,
    Id,
    UserId,
    BatchId,
    Filename,
    SizeBytes,
    ContentSha256,
    RowCount,
    SkippedRows,
    Status,
    UploadedAt,
}
