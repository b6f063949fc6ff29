//! API endpoint modules.

pub mod contact;
pub mod health;
pub mod openapi;
pub mod pages;
pub mod session;
pub mod upload;

pub use contact::configure_routes as configure_contact_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use pages::configure_routes as configure_page_routes;
pub use session::configure_routes as configure_session_routes;
pub use upload::configure_routes as configure_upload_routes;

use actix_web::web;

use crate::error::AppError;

/// JSON extractor settings: malformed bodies and wrong content types answer
/// with the usual `{success:false, error}` body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}
