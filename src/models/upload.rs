//! Upload, batch and validation models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entity::upload_file;

/// Kind of a validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// No active column mapping is configured
    NoMapping,
    /// File has no header or no data rows
    EmptyFile,
    /// File extension is not a supported delimited format
    UnsupportedFormat,
    /// File could not be decoded or tokenized
    ParseError,
    /// A mapped source column is absent from the header
    MissingColumn,
    /// A required field is blank in a data row
    MissingValue,
    /// A value does not conform to its field type
    InvalidType,
}

impl ValidationErrorKind {
    /// Row-level problems can be skipped under the lenient row policy.
    pub fn is_row_level(&self) -> bool {
        matches!(self, Self::MissingValue | Self::InvalidType)
    }
}

/// One validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub kind: ValidationErrorKind,
    pub message: String,
    /// Line number in the file (header is line 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl ValidationIssue {
    pub fn file_level(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            row: None,
            column: None,
        }
    }

    pub fn at(
        kind: ValidationErrorKind,
        row: usize,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            row: Some(row),
            column: Some(column.into()),
        }
    }
}

/// Outcome of validating a file against the active mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Problems in file order
    pub errors: Vec<ValidationIssue>,
    /// Data rows seen (excluding header and blank lines)
    pub total_rows: usize,
    /// Data rows without any problem
    pub valid_rows: usize,
}

impl ValidationResult {
    pub fn has_file_level_errors(&self) -> bool {
        self.errors.iter().any(|e| !e.kind.is_row_level())
    }

    /// Short human-readable summary of the first few problems.
    pub fn summary(&self) -> String {
        const SHOWN: usize = 3;
        let mut parts: Vec<String> = self
            .errors
            .iter()
            .take(SHOWN)
            .map(|e| e.message.clone())
            .collect();
        if self.errors.len() > SHOWN {
            parts.push(format!("and {} more", self.errors.len() - SHOWN));
        }
        parts.join("; ")
    }
}

/// Terminal status of a stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UploadFileStatus {
    /// Every data row was stored
    Completed,
    /// Some invalid rows were skipped
    Partial,
}

impl UploadFileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Partial => "partial",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            "partial" => Some(Self::Partial),
            _ => None,
        }
    }
}

/// Batch lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Processing,
    Completed,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }
}

/// A stored upload, as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadRecord {
    pub file_id: i32,
    pub filename: String,
    pub row_count: i32,
    pub skipped_rows: i32,
    pub status: UploadFileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<i32>,
    pub uploaded_at: DateTime<Utc>,
    /// Row problems that were skipped (lenient row policy only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub row_errors: Vec<ValidationIssue>,
}

impl UploadRecord {
    pub fn from_model(m: upload_file::Model, row_errors: Vec<ValidationIssue>) -> Self {
        Self {
            file_id: m.id,
            filename: m.filename,
            row_count: m.row_count,
            skipped_rows: m.skipped_rows,
            status: UploadFileStatus::parse(&m.status).unwrap_or(UploadFileStatus::Completed),
            batch_id: m.batch_id,
            uploaded_at: m.uploaded_at,
            row_errors,
        }
    }
}

/// Per-file result inside a batch.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileOutcome {
    pub filename: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub row_errors: Vec<ValidationIssue>,
}

impl FileOutcome {
    pub fn stored(record: UploadRecord) -> Self {
        Self {
            filename: record.filename,
            success: true,
            file_id: Some(record.file_id),
            row_count: Some(record.row_count),
            error: None,
            row_errors: record.row_errors,
        }
    }

    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            success: false,
            file_id: None,
            row_count: None,
            error: Some(error.into()),
            row_errors: Vec::new(),
        }
    }
}

/// Result of a batch upload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchRecord {
    pub batch_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_name: Option<String>,
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    /// Outcomes in submission order
    pub details: Vec<FileOutcome>,
}

/// Most recent upload for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestUpload {
    Batch(i32),
    File(i32),
}
