//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Report Upload Server",
        version = "0.1.0",
        description = "API for uploading tabular data files, validating them against the active column mapping, and tracking uploads"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Upload endpoints
        api::upload::upload_file,
        api::upload::upload_batch,
        api::upload::validate_file,
        api::upload::latest_file,
        // Contact endpoint
        api::contact::submit_contact,
        // Session endpoints
        api::session::create_session,
        api::session::delete_session,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Upload
            models::UploadForm,
            models::BatchUploadForm,
            models::UploadResponse,
            models::BatchUploadResponse,
            models::ValidateResponse,
            models::UploadRecord,
            models::UploadFileStatus,
            models::BatchRecord,
            models::FileOutcome,
            models::ValidationResult,
            models::ValidationIssue,
            models::ValidationErrorKind,
            models::UserIdInput,
            models::LatestFileRequest,
            models::LatestFileResponse,
            models::LatestFileData,
            models::LatestUploadType,
            // Contact
            models::ContactRequest,
            models::ContactResponse,
            // Session
            models::SessionRequest,
            models::SessionResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Upload", description = "File upload, batch upload and validation"),
        (name = "Contact", description = "Contact form forwarding"),
        (name = "Session", description = "Session cookie management")
    )
)]
pub struct ApiDoc;
