// sqlpipe-core/src/domain/record.rs
//
// Typed loading contract: a table is an ordered list of typed columns, and a
// record is one positional tuple of values matching that list.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use validator::{Validate, ValidationError};

/// Target type of a source field.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Integer,
    Float,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
        };
        f.write_str(name)
    }
}

impl FieldType {
    /// Converts one raw CSV field. Numeric fields are trimmed first; text is kept as-is.
    pub fn coerce(self, raw: &str) -> Result<FieldValue, String> {
        match self {
            FieldType::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|e| e.to_string()),
            FieldType::Float => {
                let value = raw.trim().parse::<f64>().map_err(|e| e.to_string())?;
                if value.is_finite() {
                    Ok(FieldValue::Float(value))
                } else {
                    Err("non-finite number".to_string())
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Coercion schema of one target table. Column order is the insert order.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct TableSpec {
    #[serde(rename = "table")]
    #[validate(length(min = 1, message = "Table name cannot be empty"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "A table needs at least one column"),
        custom(function = "validate_column_names")
    )]
    pub columns: Vec<ColumnSpec>,
}

impl TableSpec {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

fn validate_column_names(columns: &[ColumnSpec]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for column in columns {
        if column.name.trim().is_empty() {
            return Err(ValidationError::new("empty_column_name"));
        }
        if !seen.insert(column.name.as_str()) {
            let mut err = ValidationError::new("duplicate_column");
            err.message = Some(format!("Column '{}' is declared twice", column.name).into());
            return Err(err);
        }
    }
    Ok(())
}

/// One positional row, in the column order of its `TableSpec`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<FieldValue>,
}

impl Record {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// --- RETAIL DEFAULTS ---

pub fn store_table() -> TableSpec {
    TableSpec::new(
        "store",
        vec![
            ColumnSpec::new("store_id", FieldType::Text),
            ColumnSpec::new("store_name", FieldType::Text),
            ColumnSpec::new("city", FieldType::Text),
            ColumnSpec::new("region", FieldType::Text),
        ],
    )
}

pub fn sale_table() -> TableSpec {
    TableSpec::new(
        "sale",
        vec![
            ColumnSpec::new("sale_id", FieldType::Text),
            ColumnSpec::new("store_id", FieldType::Text),
            ColumnSpec::new("product_category", FieldType::Text),
            ColumnSpec::new("quantity", FieldType::Integer),
            ColumnSpec::new("amount", FieldType::Float),
            ColumnSpec::new("sale_date", FieldType::Text),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coercion_trims_whitespace() {
        assert_eq!(FieldType::Integer.coerce(" 42 "), Ok(FieldValue::Integer(42)));
    }

    #[test]
    fn test_integer_coercion_rejects_non_numeric() {
        assert!(FieldType::Integer.coerce("three").is_err());
        assert!(FieldType::Integer.coerce("3.0").is_err());
        assert!(FieldType::Integer.coerce("").is_err());
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(FieldType::Float.coerce("199.99"), Ok(FieldValue::Float(199.99)));
        assert_eq!(FieldType::Float.coerce("80"), Ok(FieldValue::Float(80.0)));
        assert!(FieldType::Float.coerce("NaN").is_err());
        assert!(FieldType::Float.coerce("inf").is_err());
        assert!(FieldType::Float.coerce("12,50").is_err());
    }

    #[test]
    fn test_text_is_passthrough() {
        assert_eq!(
            FieldType::Text.coerce("  Kansas City "),
            Ok(FieldValue::Text("  Kansas City ".to_string()))
        );
    }

    #[test]
    fn test_retail_tables_validate() {
        assert!(store_table().validate().is_ok());
        assert!(sale_table().validate().is_ok());
        assert_eq!(sale_table().width(), 6);
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let table = TableSpec::new(
            "dup",
            vec![
                ColumnSpec::new("id", FieldType::Text),
                ColumnSpec::new("id", FieldType::Integer),
            ],
        );
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_empty_column_list_rejected() {
        let table = TableSpec::new("empty", vec![]);
        assert!(table.validate().is_err());
    }
}
