//! Contact form endpoint.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use crate::error::AppResult;
use crate::models::{ContactRequest, ContactResponse};
use crate::services::ContactProxy;
use crate::services::contact::ContactOutcome;

/// Forward a contact form submission to the spreadsheet web-hook.
///
/// Rate-limited and failed transport attempts are retried with exponential
/// backoff before answering.
#[utoipa::path(
    post,
    path = "/api/contact/submit",
    tag = "Contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message sent", body = ContactResponse),
        (status = 400, description = "Missing fields", body = crate::error::ErrorResponse),
        (status = 401, description = "Web-hook rejected the request", body = ContactResponse),
        (status = 429, description = "Web-hook rate limited", body = ContactResponse),
        (status = 500, description = "Web-hook error or not configured", body = ContactResponse),
    )
)]
pub async fn submit_contact(
    proxy: web::Data<ContactProxy>,
    body: web::Json<ContactRequest>,
) -> AppResult<HttpResponse> {
    let outcome = proxy.submit(&body).await?;

    Ok(match outcome {
        ContactOutcome::Delivered { message } => HttpResponse::Ok().json(ContactResponse {
            success: true,
            message: Some(message),
            error: None,
        }),
        ContactOutcome::Failed { status, error } => {
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HttpResponse::build(status).json(ContactResponse {
                success: false,
                message: None,
                error: Some(error),
            })
        }
    })
}

/// Configure contact routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/contact/submit").route(web::post().to(submit_contact)));
}
