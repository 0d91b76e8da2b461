use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::errors::GenerationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    Int,
    Float,
    String,
    StringList,
    /// A relative offset (`-5y`, `+14d`, `now`, `today`) or an absolute date/timestamp.
    DateBound,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Bool => "bool",
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::String => "string",
            ParamKind::StringList => "list[string]",
            ParamKind::DateBound => "date_bound",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ParamSpec {
    pub key: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

impl ParamSpec {
    pub const fn new(key: &'static str, kind: ParamKind, required: bool) -> Self {
        Self {
            key,
            kind,
            required,
        }
    }

    pub const fn required(key: &'static str, kind: ParamKind) -> Self {
        Self::new(key, kind, true)
    }

    pub const fn optional(key: &'static str, kind: ParamKind) -> Self {
        Self::new(key, kind, false)
    }
}

/// Render a parameter list the way it is shown to callers, e.g. `(text, upper=?)`.
pub fn render_signature(specs: &[ParamSpec]) -> String {
    let parts: Vec<String> = specs
        .iter()
        .map(|spec| {
            if spec.required {
                format!("{}: {}", spec.key, spec.kind.as_str())
            } else {
                format!("{}: {} = ?", spec.key, spec.kind.as_str())
            }
        })
        .collect();
    format!("({})", parts.join(", "))
}

/// Arguments bound to a provider's declared parameters.
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    values: BTreeMap<&'static str, Value>,
}

/// Bind positional args (in declared order) and keyword args (by name).
pub fn bind_args(
    provider: &str,
    specs: &[ParamSpec],
    positional: &[Value],
    keyword: &BTreeMap<String, Value>,
) -> Result<ParamMap, GenerationError> {
    if positional.len() > specs.len() {
        return Err(invalid_args(
            provider,
            format!(
                "takes at most {} positional argument(s), got {}",
                specs.len(),
                positional.len()
            ),
        ));
    }

    let mut values = BTreeMap::new();
    for (spec, value) in specs.iter().zip(positional) {
        validate_kind(provider, spec, value)?;
        values.insert(spec.key, value.clone());
    }

    for (key, value) in keyword {
        let Some(spec) = specs.iter().find(|spec| spec.key == key.as_str()) else {
            return Err(invalid_args(provider, format!("unknown argument '{key}'")));
        };
        if values.contains_key(spec.key) {
            return Err(invalid_args(
                provider,
                format!("argument '{key}' given both positionally and by name"),
            ));
        }
        validate_kind(provider, spec, value)?;
        values.insert(spec.key, value.clone());
    }

    for spec in specs {
        if spec.required && !values.contains_key(spec.key) {
            return Err(invalid_args(
                provider,
                format!("missing required argument '{}'", spec.key),
            ));
        }
    }

    Ok(ParamMap { values })
}

impl ParamMap {
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.values
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|value| usize::try_from(value).ok())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn get_str_list(&self, key: &str) -> Option<Vec<&str>> {
        self.values
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
    }
}

fn validate_kind(provider: &str, spec: &ParamSpec, value: &Value) -> Result<(), GenerationError> {
    let valid = match spec.kind {
        ParamKind::Bool => value.is_boolean(),
        ParamKind::Int => value.as_i64().is_some(),
        ParamKind::Float => value.as_f64().is_some(),
        ParamKind::String => value.is_string(),
        ParamKind::StringList => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
        ParamKind::DateBound => value.as_str().is_some_and(|raw| {
            parse_date_bound(raw, NaiveDateTime::default()).is_some()
        }),
    };

    if valid {
        Ok(())
    } else {
        Err(invalid_args(
            provider,
            format!(
                "argument '{}' must be of type {}",
                spec.key,
                spec.kind.as_str()
            ),
        ))
    }
}

fn invalid_args(provider: &str, message: String) -> GenerationError {
    GenerationError::InvalidArgs {
        provider: provider.to_string(),
        message,
    }
}

/// Resolve a date bound against `now`.
///
/// Accepts `now`, `today`, signed offsets with units `y`, `w`, `d`, `h`, `m`, `s`
/// (`-5y`, `+14d`; a year counts as 365 days), `%Y-%m-%d`, and timestamps.
pub fn parse_date_bound(raw: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    match raw {
        "now" => return Some(now),
        "today" => return now.date().and_hms_opt(0, 0, 0),
        _ => {}
    }

    if let Some(offset) = parse_offset(raw) {
        return now.checked_add_signed(offset);
    }

    parse_timestamp_value(raw)
        .or_else(|| parse_date_value(raw).and_then(|date| date.and_hms_opt(0, 0, 0)))
}

fn parse_offset(raw: &str) -> Option<Duration> {
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => (1, raw),
    };
    let unit = rest.chars().last()?;
    let amount: i64 = rest[..rest.len() - unit.len_utf8()].parse().ok()?;
    let amount = amount.checked_mul(sign)?;
    match unit {
        'y' => Duration::try_days(amount.checked_mul(365)?),
        'w' => Duration::try_weeks(amount),
        'd' => Duration::try_days(amount),
        'h' => Duration::try_hours(amount),
        'm' => Duration::try_minutes(amount),
        's' => Duration::try_seconds(amount),
        _ => None,
    }
}

pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn parse_timestamp_value(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_utc())
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok())
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").ok())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SPECS: &[ParamSpec] = &[
        ParamSpec::required("text", ParamKind::String),
        ParamSpec::optional("upper", ParamKind::Bool),
    ];

    #[test]
    fn binds_positional_then_keyword() {
        let mut keyword = BTreeMap::new();
        keyword.insert("upper".to_string(), json!(true));
        let params = bind_args("bothify", SPECS, &[json!("??-##")], &keyword).expect("bind");
        assert_eq!(params.get_str("text"), Some("??-##"));
        assert_eq!(params.get_bool("upper"), Some(true));
    }

    #[test]
    fn rejects_bad_bindings() {
        let empty = BTreeMap::new();
        assert!(bind_args("bothify", SPECS, &[], &empty).is_err());
        assert!(bind_args("bothify", SPECS, &[json!(1)], &empty).is_err());
        assert!(bind_args("bothify", SPECS, &[json!("a"), json!(true), json!(1)], &empty).is_err());

        let mut duplicate = BTreeMap::new();
        duplicate.insert("text".to_string(), json!("b"));
        assert!(bind_args("bothify", SPECS, &[json!("a")], &duplicate).is_err());
    }

    #[test]
    fn parses_relative_bounds() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap_or_default();
        assert_eq!(parse_date_bound("now", now), Some(now));
        assert_eq!(
            parse_date_bound("-1y", now).map(|dt| dt.date()),
            NaiveDate::from_ymd_opt(2023, 6, 2)
        );
        assert_eq!(
            parse_date_bound("+14d", now).map(|dt| dt.date()),
            NaiveDate::from_ymd_opt(2024, 6, 15)
        );
        assert_eq!(
            parse_date_bound("2020-01-01", now).map(|dt| dt.date()),
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
        assert_eq!(parse_date_bound("soon", now), None);
        assert_eq!(parse_date_bound("--9223372036854775808d", now), None);
        assert_eq!(parse_date_bound("+9223372036854775807y", now), None);
    }
}
