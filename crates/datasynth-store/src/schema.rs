//! Column typing and identifier quoting shared by the embedded store and
//! the destinations.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{Value as SqlValue, ValueRef};

use datasynth_core::{DATE_FORMAT, GeneratedValue, RecordSet, TIMESTAMP_FORMAT, ValueKind};

use crate::error::{Result, StoreError};

/// Declared type of a persisted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Boolean,
    BigInt,
    Double,
    Text,
    Date,
    Timestamp,
    Json,
}

impl ColumnType {
    pub fn decl(self) -> &'static str {
        match self {
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Text => "TEXT",
            ColumnType::Date => "DATE",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Json => "JSON",
        }
    }

    /// Case-insensitive; unknown declarations (and expressions without one) return `None`.
    pub fn from_decl(decl: &str) -> Option<Self> {
        match decl.trim().to_ascii_uppercase().as_str() {
            "BOOLEAN" => Some(ColumnType::Boolean),
            "BIGINT" => Some(ColumnType::BigInt),
            "DOUBLE" => Some(ColumnType::Double),
            "TEXT" => Some(ColumnType::Text),
            "DATE" => Some(ColumnType::Date),
            "TIMESTAMP" => Some(ColumnType::Timestamp),
            "JSON" => Some(ColumnType::Json),
            _ => None,
        }
    }

    fn from_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Bool => ColumnType::Boolean,
            ValueKind::Int => ColumnType::BigInt,
            ValueKind::Float => ColumnType::Double,
            ValueKind::Text => ColumnType::Text,
            ValueKind::Date => ColumnType::Date,
            ValueKind::Timestamp => ColumnType::Timestamp,
            ValueKind::Map => ColumnType::Json,
        }
    }

    /// Binding for one cell. Values that do not match the column kind are stored as text.
    pub fn encode(self, value: &GeneratedValue) -> SqlValue {
        match (self, value) {
            (_, GeneratedValue::Null) => SqlValue::Null,
            (ColumnType::Boolean, GeneratedValue::Bool(value)) => SqlValue::Integer(*value as i64),
            (ColumnType::BigInt, GeneratedValue::Int(value)) => SqlValue::Integer(*value),
            (ColumnType::Double, GeneratedValue::Float(value)) => SqlValue::Real(*value),
            (_, other) => SqlValue::Text(other.to_text()),
        }
    }

    /// Reads a stored cell back into the value model.
    pub fn decode(column: Option<Self>, value: ValueRef<'_>) -> GeneratedValue {
        match (column, value) {
            (_, ValueRef::Null) => GeneratedValue::Null,
            (Some(ColumnType::Boolean), ValueRef::Integer(value)) => {
                GeneratedValue::Bool(value != 0)
            }
            (Some(ColumnType::Double), ValueRef::Integer(value)) => {
                GeneratedValue::Float(value as f64)
            }
            (_, ValueRef::Integer(value)) => GeneratedValue::Int(value),
            (_, ValueRef::Real(value)) => GeneratedValue::Float(value),
            (column, ValueRef::Text(bytes)) => {
                let text = String::from_utf8_lossy(bytes);
                decode_text(column, &text)
            }
            (_, ValueRef::Blob(bytes)) => {
                GeneratedValue::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn decode_text(column: Option<ColumnType>, text: &str) -> GeneratedValue {
    let parsed = match column {
        Some(ColumnType::Date) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()
            .map(GeneratedValue::Date),
        Some(ColumnType::Timestamp) => NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
            .ok()
            .map(GeneratedValue::Timestamp),
        Some(ColumnType::Json) => serde_json::from_str::<serde_json::Value>(text)
            .ok()
            .map(|value| GeneratedValue::from_json(&value)),
        _ => None,
    };
    parsed.unwrap_or_else(|| GeneratedValue::Text(text.to_string()))
}

/// Column names with their declared type, in record set order.
///
/// The first non-null value picks the type; a column mixing kinds, or holding
/// only nulls, is `TEXT`.
pub fn infer_columns(records: &RecordSet) -> Vec<(String, ColumnType)> {
    records
        .columns()
        .iter()
        .map(|column| {
            let mut kind: Option<ValueKind> = None;
            let mut mixed = false;
            for row in records.rows() {
                let Some(current) = records.cell(row, column).kind() else {
                    continue;
                };
                match kind {
                    None => kind = Some(current),
                    Some(seen) if seen != current => {
                        mixed = true;
                        break;
                    }
                    Some(_) => {}
                }
            }
            let column_type = match kind {
                Some(kind) if !mixed => ColumnType::from_kind(kind),
                _ => ColumnType::Text,
            };
            (column.clone(), column_type)
        })
        .collect()
}

/// Double-quoted identifier with embedded quotes doubled.
pub fn quote_ident(name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(StoreError::Core(datasynth_core::Error::InvalidIdentifier(
            "table and column names must not be empty".to_string(),
        )));
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use datasynth_core::Row;

    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("orders").expect("quote"), "\"orders\"");
        assert_eq!(quote_ident("we\"ird").expect("quote"), "\"we\"\"ird\"");
        assert!(quote_ident("  ").is_err());
    }

    #[test]
    fn infers_types_from_first_non_null_value() {
        let mut first = Row::new();
        first.insert("flag", GeneratedValue::Null);
        first.insert("count", GeneratedValue::Int(3));
        first.insert("mixed", GeneratedValue::Int(1));
        first.insert("empty", GeneratedValue::Null);
        first.insert("profile", GeneratedValue::Map(BTreeMap::new()));
        let mut second = Row::new();
        second.insert("flag", GeneratedValue::Bool(true));
        second.insert("count", GeneratedValue::Int(4));
        second.insert("mixed", GeneratedValue::text("one"));
        second.insert("empty", GeneratedValue::Null);
        second.insert("profile", GeneratedValue::Null);

        let records = RecordSet::from_rows(vec![first, second]);
        let types: Vec<ColumnType> = infer_columns(&records)
            .into_iter()
            .map(|(_, column_type)| column_type)
            .collect();
        assert_eq!(
            types,
            [
                ColumnType::Boolean,
                ColumnType::BigInt,
                ColumnType::Text,
                ColumnType::Text,
                ColumnType::Json,
            ]
        );
    }

    #[test]
    fn decodes_by_declared_type() {
        assert_eq!(
            ColumnType::decode(Some(ColumnType::Boolean), ValueRef::Integer(1)),
            GeneratedValue::Bool(true)
        );
        assert_eq!(
            ColumnType::decode(Some(ColumnType::Date), ValueRef::Text(b"2024-02-29")),
            GeneratedValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).expect("date"))
        );
        assert_eq!(
            ColumnType::decode(Some(ColumnType::Date), ValueRef::Text(b"soon")),
            GeneratedValue::text("soon")
        );
        assert_eq!(
            ColumnType::decode(None, ValueRef::Integer(7)),
            GeneratedValue::Int(7)
        );
    }
}
