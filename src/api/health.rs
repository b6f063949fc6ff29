//! Liveness and readiness endpoints.
//!
//! `/ready` goes through the same mapping query the upload path uses, so a
//! reachable database with a missing schema is reported as not ready.

use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::db::DbPool;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    status: &'static str,
    database: &'static str,
    /// Active column mappings; uploads are rejected while this is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    active_mappings: Option<usize>,
}

/// Liveness probe. Always 200 while the process serves requests.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness probe.
///
/// 200 once the database answers and the mapping table is readable, with
/// the number of active mappings. 503 otherwise.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready to accept uploads", body = ReadyResponse),
        (status = 503, description = "Database unavailable", body = ReadyResponse)
    )
)]
#[get("/ready")]
pub async fn ready(pool: web::Data<DbPool>) -> HttpResponse {
    match pool.list_active_column_mappings().await {
        Ok(mappings) => HttpResponse::Ok().json(ReadyResponse {
            status: "ready",
            database: "connected",
            active_mappings: Some(mappings.len()),
        }),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            HttpResponse::ServiceUnavailable().json(ReadyResponse {
                status: "not_ready",
                database: "unavailable",
                active_mappings: None,
            })
        }
    }
}

pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(ready);
}
