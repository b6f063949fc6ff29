//! Session endpoints: remember or forget the caller's user id.

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{SessionRequest, SessionResponse};
use crate::services::session::{clear_session_cookie, create_session_token, session_cookie};

/// Start a session for `user_id`.
#[utoipa::path(
    post,
    path = "/api/session",
    tag = "Session",
    request_body = SessionRequest,
    responses(
        (status = 200, description = "Session cookie set", body = SessionResponse),
        (status = 400, description = "Invalid user_id", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_session(
    config: web::Data<Config>,
    body: web::Json<SessionRequest>,
) -> AppResult<HttpResponse> {
    let user_id = body
        .user_id
        .resolve()?
        .ok_or_else(|| AppError::InvalidInput("user_id is required".to_string()))?;

    let token = create_session_token(user_id, &config.session)?;
    info!(user_id, "Session started");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, &config.session))
        .json(SessionResponse {
            success: true,
            user_id: Some(user_id),
        }))
}

/// End the current session.
#[utoipa::path(
    delete,
    path = "/api/session",
    tag = "Session",
    responses(
        (status = 200, description = "Session cookie cleared", body = SessionResponse),
    )
)]
pub async fn delete_session(config: web::Data<Config>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(clear_session_cookie(&config.session))
        .json(SessionResponse {
            success: true,
            user_id: None,
        })
}

/// Configure session routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/session")
            .route(web::post().to(create_session))
            .route(web::delete().to(delete_session)),
    );
}
