//! Checks a parsed file against the active column mapping.
//!
//! Problems are accumulated in row order rather than failing on the first
//! one, and nothing here touches the database.

use serde_json::{Map, Number, Value as JsonValue};

use super::parser::{ParsedRow, ParsedTable, parse_table};
use crate::models::{
    ActiveMappings, FieldRule, FieldType, ValidationErrorKind, ValidationIssue, ValidationResult,
};

/// A data row converted to canonical field names.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
    pub line: usize,
    pub data: Map<String, JsonValue>,
}

/// Validation outcome plus the rows that passed.
#[derive(Debug, Clone)]
pub struct CheckedFile {
    pub result: ValidationResult,
    pub accepted: Vec<CanonicalRow>,
}

impl CheckedFile {
    fn rejected(issue: ValidationIssue) -> Self {
        Self {
            result: ValidationResult {
                is_valid: false,
                errors: vec![issue],
                total_rows: 0,
                valid_rows: 0,
            },
            accepted: Vec::new(),
        }
    }
}

/// Validate a file without keeping the converted rows.
pub fn validate_file(filename: &str, bytes: &[u8], mappings: &ActiveMappings) -> ValidationResult {
    check_file(filename, bytes, mappings).result
}

/// Parse and validate a file, converting the valid rows.
pub fn check_file(filename: &str, bytes: &[u8], mappings: &ActiveMappings) -> CheckedFile {
    if mappings.is_empty() {
        return CheckedFile::rejected(ValidationIssue::file_level(
            ValidationErrorKind::NoMapping,
            "No active column mapping is configured",
        ));
    }

    match parse_table(filename, bytes) {
        Ok(table) => check_table(&table, mappings),
        Err(issue) => CheckedFile::rejected(issue),
    }
}

/// Validate an already parsed table.
pub fn check_table(table: &ParsedTable, mappings: &ActiveMappings) -> CheckedFile {
    let mut errors = Vec::new();
    let mut columns = Vec::with_capacity(mappings.len());

    for rule in mappings.rules() {
        match table.column_index(&rule.source_column) {
            Some(index) => columns.push((rule, index)),
            None => errors.push(ValidationIssue::file_level(
                ValidationErrorKind::MissingColumn,
                format!("Missing required column '{}'", rule.source_column),
            )),
        }
    }

    if !errors.is_empty() {
        return CheckedFile {
            result: ValidationResult {
                is_valid: false,
                errors,
                total_rows: table.rows.len(),
                valid_rows: 0,
            },
            accepted: Vec::new(),
        };
    }

    let mut accepted = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let before = errors.len();
        let data = convert_row(row, &columns, &mut errors);
        if errors.len() == before {
            accepted.push(CanonicalRow {
                line: row.line,
                data,
            });
        }
    }

    CheckedFile {
        result: ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            total_rows: table.rows.len(),
            valid_rows: accepted.len(),
        },
        accepted,
    }
}

fn convert_row(
    row: &ParsedRow,
    columns: &[(&FieldRule, usize)],
    errors: &mut Vec<ValidationIssue>,
) -> Map<String, JsonValue> {
    let mut data = Map::with_capacity(columns.len());

    for (rule, index) in columns {
        let value = row.cell(*index);

        if value.is_empty() {
            if rule.required {
                errors.push(ValidationIssue::at(
                    ValidationErrorKind::MissingValue,
                    row.line,
                    &rule.source_column,
                    format!(
                        "Row {}: missing value for '{}'",
                        row.line, rule.source_column
                    ),
                ));
            }
            data.insert(rule.canonical_field.clone(), JsonValue::Null);
            continue;
        }

        if !rule.field_type.accepts(value) {
            errors.push(ValidationIssue::at(
                ValidationErrorKind::InvalidType,
                row.line,
                &rule.source_column,
                format!(
                    "Row {}: '{}' value '{}' is not a valid {}",
                    row.line,
                    rule.source_column,
                    value,
                    rule.field_type.as_str()
                ),
            ));
            continue;
        }

        data.insert(rule.canonical_field.clone(), typed_value(rule.field_type, value));
    }

    data
}

/// JSON value for a cell that already passed its type check.
fn typed_value(field_type: FieldType, value: &str) -> JsonValue {
    let digits: String = value.chars().filter(|c| *c != ',' && *c != '_').collect();
    match field_type {
        FieldType::Integer => digits
            .parse::<i64>()
            .map(JsonValue::from)
            .unwrap_or_else(|_| JsonValue::String(value.to_string())),
        FieldType::Number => digits
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(value.to_string())),
        _ => JsonValue::String(value.to_string()),
    }
}
