//! Domain models for the upload server.

pub mod mapping;
pub mod requests;
pub mod upload;

// Re-export commonly used types
pub use mapping::{ActiveMappings, ColumnMapping, FieldRule, FieldType, NewColumnMapping};
pub use requests::{
    BatchUploadForm, BatchUploadResponse, ContactRequest, ContactResponse, LatestFileData,
    LatestFileRequest, LatestFileResponse, LatestUploadType, SessionRequest, SessionResponse,
    UploadForm, UploadResponse, UserIdInput, ValidateResponse, parse_user_id,
};
pub use upload::{
    BatchRecord, BatchStatus, FileOutcome, LatestUpload, UploadFileStatus, UploadRecord,
    ValidationErrorKind, ValidationIssue, ValidationResult,
};
