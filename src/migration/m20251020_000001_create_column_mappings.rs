//! Create column_mappings table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ColumnMapping::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ColumnMapping::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ColumnMapping::SourceColumn)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ColumnMapping::CanonicalField)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ColumnMapping::FieldType)
                            .string_len(20)
                            .not_null()
                            .default("text"),
                    )
                    .col(
                        ColumnDef::new(ColumnMapping::Required)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ColumnMapping::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ColumnMapping::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ColumnMapping::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_column_mappings_active")
                    .table(ColumnMapping::Table)
                    .col(ColumnMapping::Active)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ColumnMapping::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ColumnMapping {
    #[sea_orm(iden = "column_mappings")]
    Table,
    Id,
    SourceColumn,
    CanonicalField,
    FieldType,
    Required,
    Active,
    CreatedAt,
    UpdatedAt,
}
