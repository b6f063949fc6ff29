//! Column mapping models and per-field validation rules.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::column_mapping;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
];

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email regex")
});

/// Expected type of a canonical field's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Integer,
    Number,
    Date,
    Datetime,
    Email,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Email => "email",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "string" => Some(Self::Text),
            "integer" | "int" => Some(Self::Integer),
            "number" | "float" | "decimal" => Some(Self::Number),
            "date" => Some(Self::Date),
            "datetime" | "timestamp" => Some(Self::Datetime),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    /// Whether a non-blank, trimmed cell value conforms to this type.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Text => true,
            Self::Integer => strip_grouping(value).parse::<i64>().is_ok(),
            Self::Number => strip_grouping(value)
                .parse::<f64>()
                .map(f64::is_finite)
                .unwrap_or(false),
            Self::Date => DATE_FORMATS
                .iter()
                .any(|fmt| NaiveDate::parse_from_str(value, fmt).is_ok()),
            Self::Datetime => {
                DateTime::parse_from_rfc3339(value).is_ok()
                    || DATETIME_FORMATS
                        .iter()
                        .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
            }
            Self::Email => EMAIL.is_match(value),
        }
    }
}

/// Drop thousands separators ("1,234,567" -> "1234567").
fn strip_grouping(value: &str) -> String {
    value.chars().filter(|c| *c != ',' && *c != '_').collect()
}

/// A stored column mapping.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ColumnMapping {
    pub id: i32,
    pub source_column: String,
    pub canonical_field: String,
    pub field_type: FieldType,
    pub required: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<column_mapping::Model> for ColumnMapping {
    fn from(m: column_mapping::Model) -> Self {
        Self {
            id: m.id,
            source_column: m.source_column,
            canonical_field: m.canonical_field,
            // Unknown stored types degrade to free text
            field_type: FieldType::parse(&m.field_type).unwrap_or_default(),
            required: m.required,
            active: m.active,
            created_at: m.created_at,
        }
    }
}

/// Validation rule for one source column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub source_column: String,
    pub canonical_field: String,
    pub field_type: FieldType,
    pub required: bool,
}

/// The active mapping set, in mapping-id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveMappings {
    rules: Vec<FieldRule>,
}

impl ActiveMappings {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Source column -> canonical field.
    pub fn as_dict(&self) -> BTreeMap<String, String> {
        self.rules
            .iter()
            .map(|r| (r.source_column.clone(), r.canonical_field.clone()))
            .collect()
    }
}

/// Input for creating a mapping (admin CLI).
#[derive(Debug, Clone, Deserialize)]
pub struct NewColumnMapping {
    pub source_column: String,
    pub canonical_field: String,
    #[serde(default)]
    pub field_type: FieldType,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}
