//! Contact form proxy tests.

use std::time::Duration;

use actix_web::http::header;
use actix_web::test;
use report_upload_lib::config::Config;
use secrecy::SecretString;
use serde_json::json;

use crate::mock_webhook::{MockWebhook, Reply, start_truncated_body};
use crate::test_helpers::{call_json, create_test_app, create_test_pool, test_config};

fn config_for(mock: &MockWebhook) -> Config {
    let mut config = test_config();
    config.contact.webhook_url = Some(SecretString::from(mock.url.clone()));
    config
}

fn contact_request() -> actix_http::Request {
    test::TestRequest::post()
        .uri("/api/contact/submit")
        .set_json(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "Hello there"
        }))
        .to_request()
}

#[actix_rt::test]
async fn test_json_success_is_forwarded() {
    let mock = MockWebhook::start(vec![Reply::new(200, r#"{"success": true}"#)]).await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, config_for(&mock)).await;

    let (status, body) = call_json(&app, contact_request()).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());

    let forms = mock.forms();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["name"], "Ada");
    assert_eq!(forms[0]["email"], "ada@example.com");
    assert_eq!(forms[0]["message"], "Hello there");
}

#[actix_rt::test]
async fn test_rate_limit_is_retried_then_succeeds() {
    let mock = MockWebhook::start(vec![
        Reply::new(429, ""),
        Reply::new(429, ""),
        Reply::new(200, "Success"),
    ])
    .await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, config_for(&mock)).await;

    let (status, body) = call_json(&app, contact_request()).await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(mock.hits(), 3);
}

#[actix_rt::test]
async fn test_rate_limit_exhausts_retries() {
    let mock = MockWebhook::start(vec![Reply::new(429, "")]).await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, config_for(&mock)).await;

    let (status, body) = call_json(&app, contact_request()).await;

    assert_eq!(status, 429);
    assert_eq!(body["success"], false);
    assert_eq!(mock.hits(), 3);
}

#[actix_rt::test]
async fn test_set_headers_error_counts_as_sent() {
    let mock = MockWebhook::start(vec![Reply::new(
        200,
        r#"{"success": false, "error": "TypeError: setHeaders is not a function"}"#,
    )])
    .await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, config_for(&mock)).await;

    let (status, body) = call_json(&app, contact_request()).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
}

#[actix_rt::test]
async fn test_upstream_failures_are_mapped() {
    for (reply, expected) in [
        (Reply::new(401, "unauthorized"), 401),
        (Reply::new(404, "missing"), 404),
        (Reply::new(503, "down"), 503),
        (
            Reply::new(200, "<!DOCTYPE html><html><title>Error</title></html>"),
            500,
        ),
        (Reply::new(200, r#"{"success": false, "error": "quota"}"#), 500),
    ] {
        let mock = MockWebhook::start(vec![reply]).await;
        let pool = create_test_pool().await;
        let app = create_test_app(&pool, config_for(&mock)).await;

        let (status, body) = call_json(&app, contact_request()).await;
        assert_eq!(status, expected, "{}", body);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
        assert_eq!(mock.hits(), 1);
    }
}

#[actix_rt::test]
async fn test_timeout_is_500() {
    let mock = MockWebhook::start(vec![
        Reply::new(200, "Success").delayed(Duration::from_millis(1500)),
    ])
    .await;
    let pool = create_test_pool().await;
    let mut config = config_for(&mock);
    config.contact.timeout = Duration::from_millis(200);
    config.contact.max_retries = 0;
    let app = create_test_app(&pool, config).await;

    let (status, body) = call_json(&app, contact_request()).await;
    assert_eq!(status, 500);
    assert!(body["error"].as_str().unwrap().contains("timed out"));
}

#[actix_rt::test]
async fn test_missing_fields_and_unconfigured_webhook() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, test_config()).await;

    let req = test::TestRequest::post()
        .uri("/api/contact/submit")
        .set_json(json!({"name": "Ada", "email": " ", "message": "Hi"}))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);

    let (status, body) = call_json(&app, contact_request()).await;
    assert_eq!(status, 500);
    assert!(body["error"].as_str().unwrap().contains("not configured"));
}

#[actix_rt::test]
async fn test_malformed_json_is_json_error() {
    let mock = MockWebhook::start(vec![Reply::new(200, "Success")]).await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, config_for(&mock)).await;

    let req = test::TestRequest::post()
        .uri("/api/contact/submit")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Json"));
    assert_eq!(mock.hits(), 0);
}

#[actix_rt::test]
async fn test_unreadable_reply_body_is_unexpected_reply() {
    let url = start_truncated_body().await;
    let pool = create_test_pool().await;
    let mut config = test_config();
    config.contact.webhook_url = Some(SecretString::from(url));
    let app = create_test_app(&pool, config).await;

    let (status, body) = call_json(&app, contact_request()).await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Unexpected reply from the contact sheet")
    );
}
