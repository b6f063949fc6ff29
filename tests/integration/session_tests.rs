//! Session cookie tests.

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::test;
use report_upload_lib::services::session::SESSION_COOKIE;
use serde_json::json;

use crate::test_helpers::{
    MultipartBody, call_json, create_test_app, create_test_pool, seed_sales_mappings,
    test_config, valid_sales_csv,
};

async fn start_session<S>(app: &S, user_id: serde_json::Value) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri("/api/session")
        .set_json(json!({ "user_id": user_id }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("session cookie not set")
        .into_owned()
}

#[actix_rt::test]
async fn test_session_user_id_is_used_when_form_omits_it() {
    let pool = create_test_pool().await;
    seed_sales_mappings(&pool).await;
    let app = create_test_app(&pool, test_config()).await;

    let cookie = start_session(&app, json!(77)).await;

    let req = MultipartBody::new()
        .file("file", "sales.csv", valid_sales_csv(1).as_bytes())
        .into_request("/api/upload")
        .cookie(cookie.clone())
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);

    let file_id = body["data"]["file_id"].as_i64().unwrap() as i32;
    let stored = pool.get_upload_file(file_id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, 77);

    let req = test::TestRequest::post()
        .uri("/api/upload/latest-file")
        .cookie(cookie)
        .set_json(json!({}))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["file_id"], file_id);
}

#[actix_rt::test]
async fn test_explicit_user_id_beats_session() {
    let pool = create_test_pool().await;
    seed_sales_mappings(&pool).await;
    let app = create_test_app(&pool, test_config()).await;

    let cookie = start_session(&app, json!("77")).await;

    let req = MultipartBody::new()
        .file("file", "sales.csv", valid_sales_csv(1).as_bytes())
        .text("user_id", "12")
        .into_request("/api/upload")
        .cookie(cookie)
        .to_request();
    let (_, body) = call_json(&app, req).await;

    let file_id = body["data"]["file_id"].as_i64().unwrap() as i32;
    let stored = pool.get_upload_file(file_id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, 12);
}

#[actix_rt::test]
async fn test_tampered_cookie_is_ignored() {
    let pool = create_test_pool().await;
    seed_sales_mappings(&pool).await;
    let app = create_test_app(&pool, test_config()).await;

    let req = MultipartBody::new()
        .file("file", "sales.csv", valid_sales_csv(1).as_bytes())
        .into_request("/api/upload")
        .cookie(Cookie::new(SESSION_COOKIE, "garbage.token.value"))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);

    let file_id = body["data"]["file_id"].as_i64().unwrap() as i32;
    let stored = pool.get_upload_file(file_id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, 1);
}

#[actix_rt::test]
async fn test_session_validation_and_logout() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, test_config()).await;

    let req = test::TestRequest::post()
        .uri("/api/session")
        .set_json(json!({"user_id": "not-a-number"}))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 400);

    let req = test::TestRequest::delete().uri("/api/session").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let removal = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("removal cookie not set");
    assert_eq!(removal.value(), "");
}

#[actix_rt::test]
async fn test_unreadable_session_body_is_json_error() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, test_config()).await;

    let req = test::TestRequest::post()
        .uri("/api/session")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(r#"{"user_id": 5}"#)
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let req = test::TestRequest::post()
        .uri("/api/session")
        .set_json(json!({}))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}
