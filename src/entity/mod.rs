//! SeaORM entity definitions.

pub mod column_mapping;
pub mod upload_batch;
pub mod upload_file;
pub mod upload_row;
