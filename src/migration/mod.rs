//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20251020_000001_create_column_mappings;
mod m20251020_000002_create_upload_batches;
mod m20251020_000003_create_upload_files;
mod m20251020_000004_create_upload_rows;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251020_000001_create_column_mappings::Migration),
            Box::new(m20251020_000002_create_upload_batches::Migration),
            Box::new(m20251020_000003_create_upload_files::Migration),
            Box::new(m20251020_000004_create_upload_rows::Migration),
        ]
    }
}
