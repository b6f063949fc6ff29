//! Column mapping service tests.

use report_upload_lib::error::AppError;
use report_upload_lib::models::{FieldType, NewColumnMapping};
use report_upload_lib::services::mapping;

use crate::test_helpers::{create_test_pool, seed_sales_mappings};

fn new_mapping(source: &str, canonical: &str) -> NewColumnMapping {
    NewColumnMapping {
        source_column: source.to_string(),
        canonical_field: canonical.to_string(),
        field_type: FieldType::Text,
        required: true,
    }
}

#[actix_rt::test]
async fn test_dict_contains_only_active_mappings() {
    let pool = create_test_pool().await;
    assert!(
        mapping::get_active_mappings_dict(&pool)
            .await
            .unwrap()
            .is_empty()
    );

    seed_sales_mappings(&pool).await;
    let all = mapping::list_mappings(&pool).await.unwrap();
    let product = all.iter().find(|m| m.source_column == "Product").unwrap();
    mapping::set_mapping_active(&pool, product.id, false)
        .await
        .unwrap();

    let dict = mapping::get_active_mappings_dict(&pool).await.unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(dict["Date"], "sale_date");
    assert_eq!(dict["Amount"], "amount");
    assert!(!dict.contains_key("Product"));

    // Inactive rows are still listed
    assert_eq!(mapping::list_mappings(&pool).await.unwrap().len(), 3);
}

#[actix_rt::test]
async fn test_create_rejects_clashes_and_blanks() {
    let pool = create_test_pool().await;
    seed_sales_mappings(&pool).await;

    let err = mapping::create_mapping(&pool, new_mapping("Date", "order_date"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let err = mapping::create_mapping(&pool, new_mapping("Sold On", "sale_date"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let err = mapping::create_mapping(&pool, new_mapping("  ", "note"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let created = mapping::create_mapping(&pool, new_mapping(" Note ", " note "))
        .await
        .unwrap();
    assert_eq!(created.source_column, "Note");
    assert_eq!(created.canonical_field, "note");
    assert!(created.active);
}

#[actix_rt::test]
async fn test_reactivation_is_refused_when_it_would_clash() {
    let pool = create_test_pool().await;
    let old = mapping::create_mapping(&pool, new_mapping("Date", "sale_date"))
        .await
        .unwrap();
    mapping::set_mapping_active(&pool, old.id, false)
        .await
        .unwrap();
    mapping::create_mapping(&pool, new_mapping("Sold On", "sale_date"))
        .await
        .unwrap();

    let err = mapping::set_mapping_active(&pool, old.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let err = mapping::set_mapping_active(&pool, 9999, true)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_rt::test]
async fn test_earliest_active_row_wins_on_conflict() {
    let pool = create_test_pool().await;
    // Written straight to the table, bypassing the clash check
    pool.insert_column_mapping(new_mapping("Date", "sale_date"))
        .await
        .unwrap();
    pool.insert_column_mapping(new_mapping("Sold On", "sale_date"))
        .await
        .unwrap();

    let active = mapping::get_active_mappings(&pool).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active.rules()[0].source_column, "Date");
}
