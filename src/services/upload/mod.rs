//! File upload pipeline: parse, validate against the active mapping, store.
//!
//! - `validate_file`: dry run, never persists
//! - `upload`: one file, stored with its canonical rows in one transaction
//! - `upload_batch`: many files under one batch record; a failing file
//!   does not abort the others

pub mod parser;
pub mod validation;

use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use crate::config::{RowErrorPolicy, UploadSettings};
use crate::db::{DbPool, NewUploadFile, NewUploadRow};
use crate::error::{AppError, AppResult};
use crate::models::{
    ActiveMappings, BatchRecord, FileOutcome, UploadFileStatus, UploadRecord, ValidationIssue,
    ValidationResult,
};
use crate::services::mapping;

use validation::CheckedFile;

/// Maximum stored filename length.
const MAX_FILENAME_LEN: usize = 255;

/// A file received in a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedPart {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedPart {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: sanitize_filename(&filename.into()),
            bytes: bytes.into(),
        }
    }

    /// Hex SHA-256 of the raw bytes.
    pub fn sha256(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

/// Keep only the final path component of a client-supplied name.
fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    base.chars().take(MAX_FILENAME_LEN).collect()
}

/// Upload service shared by the HTTP handlers.
#[derive(Clone)]
pub struct UploadService {
    pool: DbPool,
    settings: UploadSettings,
}

impl UploadService {
    pub fn new(pool: DbPool, settings: UploadSettings) -> Self {
        Self { pool, settings }
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    /// Validate a file against the current active mapping without storing it.
    pub async fn validate_file(&self, part: &UploadedPart) -> AppResult<ValidationResult> {
        let mappings = mapping::get_active_mappings(&self.pool).await?;
        Ok(validation::validate_file(&part.filename, &part.bytes, &mappings))
    }

    /// Validate and store a single file.
    pub async fn upload(&self, part: UploadedPart, user_id: i64) -> AppResult<UploadRecord> {
        let mappings = mapping::get_active_mappings(&self.pool).await?;
        self.store_file(&part, user_id, None, &mappings).await
    }

    /// Store several files under one batch.
    ///
    /// Fails as a whole only before the batch exists: no files, too many
    /// files, or no active mapping. Afterwards every file gets an outcome.
    pub async fn upload_batch(
        &self,
        parts: Vec<UploadedPart>,
        user_id: i64,
        batch_name: Option<String>,
    ) -> AppResult<BatchRecord> {
        if parts.is_empty() {
            return Err(AppError::InvalidInput("No files provided".to_string()));
        }

        if parts.len() > self.settings.max_files_per_request {
            return Err(AppError::InvalidInput(format!(
                "Too many files: {} (maximum {})",
                parts.len(),
                self.settings.max_files_per_request
            )));
        }

        let mappings = mapping::get_active_mappings(&self.pool).await?;
        if mappings.is_empty() {
            return Err(AppError::Validation(
                "No active column mapping is configured".to_string(),
            ));
        }

        let batch = self
            .pool
            .create_upload_batch(user_id, batch_name.clone())
            .await?;

        info!(
            batch_id = batch.id,
            user_id,
            files = parts.len(),
            "Processing upload batch"
        );

        let mut details = Vec::with_capacity(parts.len());
        for part in &parts {
            match self.store_file(part, user_id, Some(batch.id), &mappings).await {
                Ok(record) => details.push(FileOutcome::stored(record)),
                Err(e) => {
                    warn!(
                        batch_id = batch.id,
                        filename = %part.filename,
                        error = %e,
                        "Batch file failed"
                    );
                    details.push(FileOutcome::failed(&part.filename, e.client_message()));
                }
            }
        }

        let successful = details.iter().filter(|d| d.success).count();
        let failed = details.len() - successful;

        let batch_id = batch.id;
        let batch = self
            .pool
            .finalize_upload_batch(batch, successful as i32, failed as i32)
            .await
            .inspect_err(|e| {
                error!(
                    batch_id,
                    successful_files = successful,
                    failed_files = failed,
                    error = %e,
                    "Batch files were stored but the batch record could not be finalized"
                )
            })?;

        info!(
            batch_id = batch.id,
            successful_files = successful,
            failed_files = failed,
            "Upload batch completed"
        );

        Ok(BatchRecord {
            batch_id: batch.id,
            batch_name: batch.batch_name,
            total_files: details.len(),
            successful_files: successful,
            failed_files: failed,
            details,
        })
    }

    async fn store_file(
        &self,
        part: &UploadedPart,
        user_id: i64,
        batch_id: Option<i32>,
        mappings: &ActiveMappings,
    ) -> AppResult<UploadRecord> {
        let checked = validation::check_file(&part.filename, &part.bytes, mappings);
        let row_errors = self.accept(&checked)?;

        let status = if row_errors.is_empty() {
            UploadFileStatus::Completed
        } else {
            UploadFileStatus::Partial
        };

        let rows = checked
            .accepted
            .into_iter()
            .map(|row| NewUploadRow {
                row_number: row.line as i32,
                data: serde_json::Value::Object(row.data),
            })
            .collect();

        let file = NewUploadFile {
            user_id,
            batch_id,
            filename: part.filename.clone(),
            size_bytes: part.bytes.len() as i64,
            content_sha256: part.sha256(),
            skipped_rows: skipped_row_count(&checked.result),
            status,
        };

        let model = self.pool.insert_upload_file(file, rows).await?;

        info!(
            file_id = model.id,
            user_id,
            filename = %model.filename,
            row_count = model.row_count,
            skipped_rows = model.skipped_rows,
            "Stored uploaded file"
        );

        Ok(UploadRecord::from_model(model, row_errors))
    }

    /// Apply the row-error policy. Returns the row problems that were skipped.
    fn accept(&self, checked: &CheckedFile) -> AppResult<Vec<ValidationIssue>> {
        let result = &checked.result;
        if result.is_valid {
            return Ok(Vec::new());
        }

        match self.settings.row_error_policy {
            RowErrorPolicy::RejectFile => Err(AppError::Validation(format!(
                "File validation failed: {}",
                result.summary()
            ))),
            RowErrorPolicy::SkipInvalidRows => {
                if result.has_file_level_errors() {
                    return Err(AppError::Validation(format!(
                        "File validation failed: {}",
                        result.summary()
                    )));
                }
                if checked.accepted.is_empty() {
                    return Err(AppError::Validation(format!(
                        "File has no valid rows: {}",
                        result.summary()
                    )));
                }
                Ok(result.errors.clone())
            }
        }
    }
}

/// Number of data rows that had at least one problem.
fn skipped_row_count(result: &ValidationResult) -> i32 {
    (result.total_rows - result.valid_rows) as i32
}
