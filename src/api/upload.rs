//! Upload API handlers.

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use tracing::info;

use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    BatchUploadForm, BatchUploadResponse, LatestFileData, LatestFileRequest, LatestFileResponse,
    UploadForm, UploadResponse, ValidateResponse, ValidationErrorKind, parse_user_id,
};
use crate::services::session::resolve_user_id;
use crate::services::{UploadService, UploadedPart};

/// Multipart field names that carry files.
const FILE_FIELDS: &[&str] = &["file", "files", "files[]"];

/// Fields collected from an upload form.
#[derive(Debug, Default)]
struct UploadFormData {
    files: Vec<UploadedPart>,
    user_id: Option<String>,
    batch_name: Option<String>,
}

impl UploadFormData {
    /// The single file of a one-file request.
    fn single_file(self) -> AppResult<UploadedPart> {
        let part = self
            .files
            .into_iter()
            .next()
            .ok_or_else(|| AppError::InvalidInput("No file part in request".to_string()))?;

        if part.filename.is_empty() {
            return Err(AppError::InvalidInput("No file selected".to_string()));
        }

        Ok(part)
    }

    fn explicit_user_id(&self) -> AppResult<Option<i64>> {
        match self.user_id.as_deref() {
            Some(raw) => parse_user_id(raw),
            None => Ok(None),
        }
    }
}

/// Drain a multipart payload, enforcing the total size limit.
async fn read_upload_form(mut payload: Multipart, max_size: usize) -> AppResult<UploadFormData> {
    let mut form = UploadFormData::default();
    let mut total = 0usize;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            total += chunk.len();
            if total > max_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "upload exceeds the {} byte limit",
                    max_size
                )));
            }
            data.extend_from_slice(&chunk);
        }

        match name.as_str() {
            n if FILE_FIELDS.contains(&n) => {
                form.files
                    .push(UploadedPart::new(filename.unwrap_or_default(), data));
            }
            "user_id" => form.user_id = Some(String::from_utf8_lossy(&data).into_owned()),
            "batch_name" => {
                let batch_name = String::from_utf8_lossy(&data).trim().to_string();
                form.batch_name = Some(batch_name).filter(|n| !n.is_empty());
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Upload a single file.
///
/// The file is validated against the active column mapping and stored with
/// its rows. `user_id` falls back to the session, then the configured default.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "Upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file, bad user_id or validation failure", body = crate::error::ErrorResponse),
        (status = 413, description = "Upload too large", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_file(
    req: HttpRequest,
    config: web::Data<Config>,
    service: web::Data<UploadService>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_upload_form(payload, service.settings().max_upload_size).await?;
    let user_id = resolve_user_id(form.explicit_user_id()?, &req, &config);
    let part = form.single_file()?;

    let record = service.upload(part, user_id).await?;
    let message = format!(
        "Uploaded '{}' ({} rows)",
        record.filename, record.row_count
    );

    Ok(HttpResponse::Ok().json(UploadResponse {
        success: true,
        message,
        data: record,
    }))
}

/// Upload several files as one batch.
///
/// Each file is processed independently; per-file failures are reported in
/// `details` and do not fail the request.
#[utoipa::path(
    post,
    path = "/api/upload/batch",
    tag = "Upload",
    request_body(content = BatchUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Batch processed", body = BatchUploadResponse),
        (status = 400, description = "No files, too many files or no active mapping", body = crate::error::ErrorResponse),
        (status = 413, description = "Upload too large", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_batch(
    req: HttpRequest,
    config: web::Data<Config>,
    service: web::Data<UploadService>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_upload_form(payload, service.settings().max_upload_size).await?;
    let user_id = resolve_user_id(form.explicit_user_id()?, &req, &config);

    // Browsers send an empty part when no file was chosen
    let parts: Vec<UploadedPart> = form
        .files
        .into_iter()
        .filter(|p| !p.filename.is_empty())
        .collect();

    let batch = service.upload_batch(parts, user_id, form.batch_name).await?;
    let message = format!(
        "Processed {} files: {} succeeded, {} failed",
        batch.total_files, batch.successful_files, batch.failed_files
    );

    Ok(HttpResponse::Ok().json(BatchUploadResponse {
        success: true,
        message,
        data: batch,
    }))
}

/// Validate a file without storing it.
///
/// Content problems are reported in `data.errors` with status 200. `success`
/// is false only when no column mapping is configured.
#[utoipa::path(
    post,
    path = "/api/upload/validate",
    tag = "Upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Validation result", body = ValidateResponse),
        (status = 400, description = "Missing file", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse),
    )
)]
pub async fn validate_file(
    service: web::Data<UploadService>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_upload_form(payload, service.settings().max_upload_size).await?;
    let part = form.single_file()?;

    let result = service.validate_file(&part).await?;
    let success = !result
        .errors
        .iter()
        .any(|e| e.kind == ValidationErrorKind::NoMapping);

    info!(
        filename = %part.filename,
        is_valid = result.is_valid,
        errors = result.errors.len(),
        "Validated upload"
    );

    Ok(HttpResponse::Ok().json(ValidateResponse {
        success,
        data: result,
    }))
}

/// Most recent upload for the user.
///
/// A batch takes priority over a lone file.
#[utoipa::path(
    post,
    path = "/api/upload/latest-file",
    tag = "Upload",
    request_body(content = LatestFileRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Latest upload", body = LatestFileResponse),
        (status = 400, description = "Invalid user_id", body = crate::error::ErrorResponse),
        (status = 404, description = "No uploaded file", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse),
    )
)]
pub async fn latest_file(
    req: HttpRequest,
    config: web::Data<Config>,
    pool: web::Data<DbPool>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let request: LatestFileRequest = if body.iter().all(u8::is_ascii_whitespace) {
        LatestFileRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let explicit = request
        .user_id
        .map(|id| id.resolve())
        .transpose()?
        .flatten();
    let user_id = resolve_user_id(explicit, &req, &config);

    let latest = pool
        .get_latest_upload(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Uploaded file".to_string()))?;

    Ok(HttpResponse::Ok().json(LatestFileResponse {
        success: true,
        data: LatestFileData::from(latest),
    }))
}

/// Configure upload routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/upload").route(web::post().to(upload_file)))
        .service(web::resource("/api/upload/batch").route(web::post().to(upload_batch)))
        .service(web::resource("/api/upload/validate").route(web::post().to(validate_file)))
        .service(web::resource("/api/upload/latest-file").route(web::post().to(latest_file)));
}
