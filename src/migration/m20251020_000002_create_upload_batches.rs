//! Create upload_batches table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UploadBatch::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UploadBatch::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UploadBatch::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UploadBatch::BatchName).string_len(255))
                    .col(
                        ColumnDef::new(UploadBatch::SuccessfulFiles)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UploadBatch::FailedFiles)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UploadBatch::Status)
                            .string_len(20)
                            .not_null()
                            .default("processing"),
                    )
                    .col(
                        ColumnDef::new(UploadBatch::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(UploadBatch::CompletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_upload_batches_user_created")
                    .table(UploadBatch::Table)
                    .col(UploadBatch::UserId)
                    .col(UploadBatch::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UploadBatch::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UploadBatch {
    #[sea_orm(iden = "upload_batches")]
    Table,
    Id,
    UserId,
    BatchName,
    SuccessfulFiles,
    FailedFiles,
    Status,
    CreatedAt,
    CompletedAt,
}
