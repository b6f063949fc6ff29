//! Report upload server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use report_upload_lib::api::{self, ApiDoc};
use report_upload_lib::config::Config;
use report_upload_lib::db::DbPool;
use report_upload_lib::middleware::RequestLogger;
use report_upload_lib::services::{ContactProxy, UploadService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, RPT_DATABASE_URL and RPT_SESSION_SECRET must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Report Upload Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let pool = DbPool::new(&config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    info!("Database connection established");

    pool.run_migrations()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let upload_service = UploadService::new(pool.clone(), config.upload.clone());
    let contact_proxy = ContactProxy::new(config.contact.clone())
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    info!(
        "Upload limits: {}MB per request, {} files per batch, row policy '{}'",
        config.upload.max_upload_size / 1024 / 1024,
        config.upload.max_files_per_request,
        config.upload.row_error_policy.as_str()
    );

    if config.contact.webhook_url.is_none() {
        warn!("RPT_CONTACT_WEBHOOK_URL is not set; the contact form will report an error");
    }

    let bind_address = config.bind_address();
    let is_development = config.is_development();
    let static_dir = config.static_dir.clone();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!("Starting server at http://{} ({} workers)", bind_address, cpus);
        cpus
    };
    info!("API docs at http://{}/apidocs/", bind_address);

    let config = web::Data::new(config);
    let pool = web::Data::new(pool);
    let upload_service = web::Data::new(upload_service);
    let contact_proxy = web::Data::new(contact_proxy);

    HttpServer::new(move || {
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .supports_credentials()
                .max_age(3600)
        } else {
            // Same-origin only
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        let static_dir = static_dir.clone();

        App::new()
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(api::json_config())
            .app_data(config.clone())
            .app_data(pool.clone())
            .app_data(upload_service.clone())
            .app_data(contact_proxy.clone())
            .configure(api::configure_health_routes)
            .configure(api::configure_upload_routes)
            .configure(api::configure_contact_routes)
            .configure(api::configure_session_routes)
            .configure(|cfg| api::configure_page_routes(cfg, static_dir))
            .service(
                SwaggerUi::new("/apidocs/{_:.*}").url("/apispec.json", ApiDoc::openapi()),
            )
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run()
    .await
}
