use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Number, Value};

/// Canonical date rendering used by exports and the embedded store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical timestamp rendering used by exports and the embedded store.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single generated cell.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    /// Small fixed mapping of named sub-values (e.g. social profile handles).
    Map(BTreeMap<String, String>),
}

/// Storage-level kind of a value, used to pick column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Date,
    Timestamp,
    Map,
}

impl GeneratedValue {
    pub fn text(value: impl Into<String>) -> Self {
        GeneratedValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GeneratedValue::Null)
    }

    /// Returns `None` for nulls.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            GeneratedValue::Null => None,
            GeneratedValue::Bool(_) => Some(ValueKind::Bool),
            GeneratedValue::Int(_) => Some(ValueKind::Int),
            GeneratedValue::Float(_) => Some(ValueKind::Float),
            GeneratedValue::Text(_) => Some(ValueKind::Text),
            GeneratedValue::Date(_) => Some(ValueKind::Date),
            GeneratedValue::Timestamp(_) => Some(ValueKind::Timestamp),
            GeneratedValue::Map(_) => Some(ValueKind::Map),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GeneratedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GeneratedValue::Int(value) => Some(*value as f64),
            GeneratedValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GeneratedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GeneratedValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            GeneratedValue::Date(value) => Some(*value),
            GeneratedValue::Timestamp(value) => Some(value.date()),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            GeneratedValue::Timestamp(value) => Some(*value),
            GeneratedValue::Date(value) => value.and_hms_opt(0, 0, 0),
            _ => None,
        }
    }

    /// Plain text rendering; nulls render as an empty string.
    pub fn to_text(&self) -> String {
        match self {
            GeneratedValue::Null => String::new(),
            GeneratedValue::Bool(value) => value.to_string(),
            GeneratedValue::Int(value) => value.to_string(),
            GeneratedValue::Float(value) => value.to_string(),
            GeneratedValue::Text(value) => value.clone(),
            GeneratedValue::Date(value) => value.format(DATE_FORMAT).to_string(),
            GeneratedValue::Timestamp(value) => value.format(TIMESTAMP_FORMAT).to_string(),
            GeneratedValue::Map(_) => self.to_json().to_string(),
        }
    }

    /// Like [`GeneratedValue::to_text`] but keeps nulls distinguishable.
    pub fn to_optional_text(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.to_text())
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            GeneratedValue::Null => Value::Null,
            GeneratedValue::Bool(value) => Value::Bool(*value),
            GeneratedValue::Int(value) => Value::Number((*value).into()),
            GeneratedValue::Float(value) => Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            GeneratedValue::Text(value) => Value::String(value.clone()),
            GeneratedValue::Date(_) | GeneratedValue::Timestamp(_) => Value::String(self.to_text()),
            GeneratedValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    /// Converts an arbitrary JSON value returned by a provider.
    ///
    /// Arrays and nested objects are flattened into their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => GeneratedValue::Null,
            Value::Bool(value) => GeneratedValue::Bool(*value),
            Value::Number(number) => match number.as_i64() {
                Some(value) => GeneratedValue::Int(value),
                None => number
                    .as_f64()
                    .map(GeneratedValue::Float)
                    .unwrap_or(GeneratedValue::Null),
            },
            Value::String(value) => GeneratedValue::Text(value.clone()),
            Value::Object(map) if map.values().all(Value::is_string) => GeneratedValue::Map(
                map.iter()
                    .map(|(key, value)| {
                        (key.clone(), value.as_str().unwrap_or_default().to_string())
                    })
                    .collect(),
            ),
            other => GeneratedValue::Text(other.to_string()),
        }
    }
}

impl From<bool> for GeneratedValue {
    fn from(value: bool) -> Self {
        GeneratedValue::Bool(value)
    }
}

impl From<i64> for GeneratedValue {
    fn from(value: i64) -> Self {
        GeneratedValue::Int(value)
    }
}

impl From<f64> for GeneratedValue {
    fn from(value: f64) -> Self {
        GeneratedValue::Float(value)
    }
}

impl From<String> for GeneratedValue {
    fn from(value: String) -> Self {
        GeneratedValue::Text(value)
    }
}

impl From<&str> for GeneratedValue {
    fn from(value: &str) -> Self {
        GeneratedValue::Text(value.to_string())
    }
}

impl From<NaiveDate> for GeneratedValue {
    fn from(value: NaiveDate) -> Self {
        GeneratedValue::Date(value)
    }
}

impl From<NaiveDateTime> for GeneratedValue {
    fn from(value: NaiveDateTime) -> Self {
        GeneratedValue::Timestamp(value)
    }
}

impl<T: Into<GeneratedValue>> From<Option<T>> for GeneratedValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(GeneratedValue::Null)
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}
