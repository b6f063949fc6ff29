//! Page and health route tests.

use actix_web::test;
use report_upload_lib::db::DbPool;
use sea_orm::ConnectOptions;

use crate::test_helpers::{create_test_app, create_test_pool, seed_sales_mappings, test_config};

#[actix_rt::test]
async fn test_pages_are_served_from_pages_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("main.html"), "<h1>Main page</h1>").unwrap();
    std::fs::write(dir.path().join("upload.html"), "<h1>Upload page</h1>").unwrap();

    let pool = create_test_pool().await;
    let mut config = test_config();
    config.pages_dir = dir.path().to_path_buf();
    let app = create_test_app(&pool, config).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"<h1>Main page</h1>");

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/upload").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);

    // Known route whose file is absent
    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/report").to_request()).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_rt::test]
async fn test_static_assets_are_served_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.css"), "body {}").unwrap();

    let pool = create_test_pool().await;
    let mut config = test_config();
    config.static_dir = Some(dir.path().to_path_buf());
    let app = create_test_app(&pool, config).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/static/app.css").to_request(),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_rt::test]
async fn test_health_and_ready() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, test_config()).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/ready").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["database"], "connected");
    assert_eq!(body["active_mappings"], 0);

    seed_sales_mappings(&pool).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/ready").to_request()).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["active_mappings"], 3);
}

#[actix_rt::test]
async fn test_ready_without_schema_is_503() {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let pool = DbPool::connect(options).await.unwrap();
    let app = create_test_app(&pool, test_config()).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/ready").to_request()).await;
    assert_eq!(resp.status().as_u16(), 503);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "not_ready");
    assert!(body.get("active_mappings").is_none());
}
