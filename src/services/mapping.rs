//! Column mapping resolution and administration.

use std::collections::{BTreeMap, HashSet};

use tracing::{info, warn};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ActiveMappings, ColumnMapping, FieldRule, NewColumnMapping};

/// Active `source column -> canonical field` pairs.
///
/// An empty map means no mapping is configured.
pub async fn get_active_mappings_dict(pool: &DbPool) -> AppResult<BTreeMap<String, String>> {
    Ok(get_active_mappings(pool).await?.as_dict())
}

/// Active mappings with their field rules, in mapping-id order.
///
/// When two active rows claim the same source column or canonical field,
/// the earliest row wins and the later one is ignored.
pub async fn get_active_mappings(pool: &DbPool) -> AppResult<ActiveMappings> {
    let rows = pool.list_active_column_mappings().await?;

    let mut sources = HashSet::new();
    let mut canonicals = HashSet::new();
    let mut rules = Vec::with_capacity(rows.len());

    for row in rows.into_iter().map(ColumnMapping::from) {
        if sources.contains(&row.source_column) || canonicals.contains(&row.canonical_field) {
            warn!(
                mapping_id = row.id,
                source_column = %row.source_column,
                canonical_field = %row.canonical_field,
                "Ignoring conflicting active column mapping"
            );
            continue;
        }
        sources.insert(row.source_column.clone());
        canonicals.insert(row.canonical_field.clone());

        rules.push(FieldRule {
            source_column: row.source_column,
            canonical_field: row.canonical_field,
            field_type: row.field_type,
            required: row.required,
        });
    }

    Ok(ActiveMappings::new(rules))
}

/// All stored mappings, active or not.
pub async fn list_mappings(pool: &DbPool) -> AppResult<Vec<ColumnMapping>> {
    Ok(pool
        .list_column_mappings()
        .await?
        .into_iter()
        .map(ColumnMapping::from)
        .collect())
}

/// Create an active mapping, keeping the active set injective.
pub async fn create_mapping(pool: &DbPool, mapping: NewColumnMapping) -> AppResult<ColumnMapping> {
    let mapping = NewColumnMapping {
        source_column: mapping.source_column.trim().to_string(),
        canonical_field: mapping.canonical_field.trim().to_string(),
        ..mapping
    };

    if mapping.source_column.is_empty() || mapping.canonical_field.is_empty() {
        return Err(AppError::InvalidInput(
            "source column and canonical field must not be empty".to_string(),
        ));
    }

    let active = get_active_mappings(pool).await?;
    for rule in active.rules() {
        if rule.source_column == mapping.source_column {
            return Err(AppError::InvalidInput(format!(
                "Source column '{}' is already mapped to '{}'",
                rule.source_column, rule.canonical_field
            )));
        }
        if rule.canonical_field == mapping.canonical_field {
            return Err(AppError::InvalidInput(format!(
                "Canonical field '{}' is already mapped from '{}'",
                rule.canonical_field, rule.source_column
            )));
        }
    }

    let created = pool.insert_column_mapping(mapping).await?;
    info!(
        mapping_id = created.id,
        source_column = %created.source_column,
        canonical_field = %created.canonical_field,
        "Created column mapping"
    );

    Ok(ColumnMapping::from(created))
}

/// Activate or deactivate a mapping.
///
/// Re-activating a mapping that would clash with the current active set is refused.
pub async fn set_mapping_active(pool: &DbPool, id: i32, active: bool) -> AppResult<()> {
    let existing = pool
        .get_column_mapping(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Mapping {}", id)))?;

    if active && !existing.active {
        let current = get_active_mappings(pool).await?;
        let clash = current.rules().iter().find(|r| {
            r.source_column == existing.source_column
                || r.canonical_field == existing.canonical_field
        });
        if let Some(rule) = clash {
            return Err(AppError::InvalidInput(format!(
                "Mapping {} conflicts with active mapping '{}' -> '{}'",
                id, rule.source_column, rule.canonical_field
            )));
        }
    }

    pool.set_column_mapping_active(id, active).await?;
    info!(mapping_id = id, active, "Updated column mapping");

    Ok(())
}
