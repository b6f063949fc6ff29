//! Typed request bodies and response envelopes for the JSON API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::upload::{BatchRecord, LatestUpload, UploadRecord, ValidationResult};
use crate::error::{AppError, AppResult};

/// A user id as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum UserIdInput {
    Number(i64),
    Text(String),
}

impl UserIdInput {
    /// Coerce to an integer id. Blank strings count as absent.
    pub fn resolve(&self) -> AppResult<Option<i64>> {
        match self {
            Self::Number(n) => Ok(Some(*n)),
            Self::Text(s) => parse_user_id(s),
        }
    }
}

/// Parse a textual user id; blank input yields `None`.
pub fn parse_user_id(raw: &str) -> AppResult<Option<i64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| AppError::InvalidInput(format!("user_id must be an integer, got '{}'", trimmed)))
}

/// Body of `POST /api/upload/latest-file`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LatestFileRequest {
    #[serde(default)]
    pub user_id: Option<UserIdInput>,
}

/// Body of `POST /api/session`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SessionRequest {
    pub user_id: UserIdInput,
}

/// Body of `POST /api/contact/submit`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Multipart form accepted by `POST /api/upload` and `/api/upload/validate`.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// CSV or TSV file
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Overrides the session / default user id
    pub user_id: Option<String>,
}

/// Multipart form accepted by `POST /api/upload/batch`.
#[derive(Debug, ToSchema)]
pub struct BatchUploadForm {
    /// One part per file; `files[]` is accepted as well
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<Vec<u8>>,
    pub user_id: Option<String>,
    pub batch_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub data: UploadRecord,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchUploadResponse {
    pub success: bool,
    pub message: String,
    pub data: BatchRecord,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateResponse {
    /// `false` when validation could not run at all (no mapping)
    pub success: bool,
    pub data: ValidationResult,
}

/// Which kind of record `/api/upload/latest-file` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LatestUploadType {
    Batch,
    File,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LatestFileData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: LatestUploadType,
}

impl From<LatestUpload> for LatestFileData {
    fn from(latest: LatestUpload) -> Self {
        match latest {
            LatestUpload::Batch(id) => Self {
                batch_id: Some(id),
                file_id: None,
                kind: LatestUploadType::Batch,
            },
            LatestUpload::File(id) => Self {
                batch_id: None,
                file_id: Some(id),
                kind: LatestUploadType::File,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LatestFileResponse {
    pub success: bool,
    pub data: LatestFileData,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}
