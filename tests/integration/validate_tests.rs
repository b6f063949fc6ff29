//! Validation endpoint tests.

use crate::test_helpers::{
    MultipartBody, SALES_WITH_ONE_BAD_ROW, call_json, create_test_app, create_test_pool,
    seed_sales_mappings, test_config, valid_sales_csv,
};

#[actix_rt::test]
async fn test_no_mapping_is_reported_with_200() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, test_config()).await;

    let req = MultipartBody::new()
        .file("file", "sales.csv", valid_sales_csv(2).as_bytes())
        .into_request("/api/upload/validate")
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["is_valid"], false);
    assert_eq!(body["data"]["errors"][0]["type"], "no_mapping");
}

#[actix_rt::test]
async fn test_valid_file() {
    let pool = create_test_pool().await;
    seed_sales_mappings(&pool).await;
    let app = create_test_app(&pool, test_config()).await;

    let req = MultipartBody::new()
        .file("file", "sales.csv", valid_sales_csv(3).as_bytes())
        .into_request("/api/upload/validate")
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["is_valid"], true);
    assert_eq!(body["data"]["errors"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["total_rows"], 3);
    assert_eq!(body["data"]["valid_rows"], 3);
}

#[actix_rt::test]
async fn test_row_errors_are_listed_and_nothing_is_stored() {
    let pool = create_test_pool().await;
    seed_sales_mappings(&pool).await;
    let app = create_test_app(&pool, test_config()).await;

    let req = MultipartBody::new()
        .file("file", "b.csv", SALES_WITH_ONE_BAD_ROW.as_bytes())
        .into_request("/api/upload/validate")
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["is_valid"], false);
    let errors = body["data"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["type"], "invalid_type");
    assert_eq!(errors[0]["row"], 3);
    assert_eq!(errors[0]["column"], "Amount");

    assert_eq!(pool.get_latest_file_id(1).await.unwrap(), None);
}

#[actix_rt::test]
async fn test_validating_twice_gives_identical_results() {
    let pool = create_test_pool().await;
    seed_sales_mappings(&pool).await;
    let app = create_test_app(&pool, test_config()).await;

    let content = "Date,Product\nnot-a-date,X\n2025-01-01,\n";
    let mut results = Vec::new();
    for _ in 0..2 {
        let req = MultipartBody::new()
            .file("file", "x.csv", content.as_bytes())
            .into_request("/api/upload/validate")
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, 200);
        results.push(body);
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(results[0]["data"]["errors"][0]["type"], "missing_column");
}

#[actix_rt::test]
async fn test_empty_and_malformed_files_are_invalid_not_errors() {
    let pool = create_test_pool().await;
    seed_sales_mappings(&pool).await;
    let app = create_test_app(&pool, test_config()).await;

    for (name, content, kind) in [
        ("empty.csv", &b""[..], "empty_file"),
        ("header.csv", &b"Date,Product,Amount\n"[..], "empty_file"),
        ("binary.csv", &[0xffu8, 0xfe, 0x00][..], "parse_error"),
        ("sheet.xlsx", &b"PK"[..], "unsupported_format"),
    ] {
        let req = MultipartBody::new()
            .file("file", name, content)
            .into_request("/api/upload/validate")
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, 200, "{}", name);
        assert_eq!(body["data"]["is_valid"], false, "{}", name);
        assert_eq!(body["data"]["errors"][0]["type"], kind, "{}", name);
    }
}

#[actix_rt::test]
async fn test_missing_file_is_400() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, test_config()).await;

    let req = MultipartBody::new()
        .text("user_id", "1")
        .into_request("/api/upload/validate")
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 400);
}
