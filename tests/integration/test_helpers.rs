//! Shared helpers for the integration tests.

use std::path::PathBuf;
use std::time::Duration;

use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::{App, test, web};
use report_upload_lib::api;
use report_upload_lib::config::{
    Config, ContactSettings, DatabaseSettings, Environment, RowErrorPolicy, SessionSettings,
    UploadSettings,
};
use report_upload_lib::db::DbPool;
use report_upload_lib::models::{FieldType, NewColumnMapping};
use report_upload_lib::services::{ContactProxy, UploadService, mapping};
use sea_orm::ConnectOptions;
use secrecy::SecretString;
use serde_json::Value;

pub const BOUNDARY: &str = "----rpt-test-boundary-7MA4YWxkTrZu0gW";

/// Fresh in-memory database with migrations applied.
pub async fn create_test_pool() -> DbPool {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let pool = DbPool::connect(options)
        .await
        .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

/// Configuration for tests; no environment variables involved.
pub fn test_config() -> Config {
    Config {
        environment: Environment::Development,
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        upload: UploadSettings {
            default_user_id: 1,
            max_upload_size: 1024 * 1024,
            max_files_per_request: 5,
            row_error_policy: RowErrorPolicy::RejectFile,
        },
        session: SessionSettings {
            secret: SecretString::from("integration-test-secret".to_string()),
            ttl_secs: 3600,
            secure_cookie: false,
        },
        contact: ContactSettings {
            webhook_url: None,
            max_retries: 2,
            retry_delay: Duration::from_millis(10),
            timeout: Duration::from_secs(2),
        },
        pages_dir: PathBuf::from("pages"),
        static_dir: None,
    }
}

/// Build the app under test with every route group registered.
pub async fn create_test_app(
    pool: &DbPool,
    config: Config,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let upload_service = UploadService::new(pool.clone(), config.upload.clone());
    let contact_proxy =
        ContactProxy::new(config.contact.clone()).expect("Failed to build contact proxy");
    let static_dir = config.static_dir.clone();

    test::init_service(
        App::new()
            .app_data(api::json_config())
            .app_data(web::Data::new(config))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(upload_service))
            .app_data(web::Data::new(contact_proxy))
            .configure(api::configure_health_routes)
            .configure(api::configure_upload_routes)
            .configure(api::configure_contact_routes)
            .configure(api::configure_session_routes)
            .configure(move |cfg| api::configure_page_routes(cfg, static_dir)),
    )
    .await
}

/// Active mappings used by most tests: Date, Product, Amount.
pub async fn seed_sales_mappings(pool: &DbPool) {
    for (source, canonical, field_type) in [
        ("Date", "sale_date", FieldType::Date),
        ("Product", "product", FieldType::Text),
        ("Amount", "amount", FieldType::Number),
    ] {
        mapping::create_mapping(
            pool,
            NewColumnMapping {
                source_column: source.to_string(),
                canonical_field: canonical.to_string(),
                field_type,
                required: true,
            },
        )
        .await
        .expect("Failed to seed mapping");
    }
}

/// A CSV with `rows` valid sales rows.
pub fn valid_sales_csv(rows: usize) -> String {
    let mut csv = String::from("Date,Product,Amount\n");
    for i in 0..rows {
        csv.push_str(&format!("2025-03-{:02},Widget {},{}.50\n", (i % 28) + 1, i, i + 1));
    }
    csv
}

/// Three rows, the second with a non-numeric amount (file line 3).
pub const SALES_WITH_ONE_BAD_ROW: &str =
    "Date,Product,Amount\n2025-03-01,Widget,10\n2025-03-02,Gadget,ten\n2025-03-03,Gizmo,30\n";

/// Builds a `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, field: &str, filename: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/csv\r\n\r\n",
                BOUNDARY, field, filename
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn text(mut self, field: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, field, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn into_request(mut self, uri: &str) -> test::TestRequest {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        test::TestRequest::post()
            .uri(uri)
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(self.body)
    }
}

/// Send a request and return status plus JSON body.
pub async fn call_json<S>(app: &S, req: actix_http::Request) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}
