use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;

use datasynth_core::GeneratedValue;
use datasynth_generate::{FieldSpec, GenerateOptions, GenerationEngine, GenerationError};

fn engine(seed: u64) -> GenerationEngine {
    let base_time: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 1, 10)
        .and_then(|date| date.and_hms_opt(8, 30, 0))
        .expect("valid base time");
    GenerationEngine::new(GenerateOptions {
        seed: Some(seed),
        base_time: Some(base_time),
        ..GenerateOptions::default()
    })
}

#[test]
fn custom_rows_follow_schema_order() {
    let specs = vec![
        FieldSpec::new("full_name", "name"),
        FieldSpec::new("code", "bothify").with_args(vec![json!("??-####")]),
        FieldSpec::new("score", "random_int")
            .with_kwarg("min", json!(10))
            .with_kwarg("max", json!(20)),
        FieldSpec::new("signup", "date_between")
            .with_kwarg("start_date", json!("-1y"))
            .with_kwarg("end_date", json!("today")),
    ];
    let result = engine(1).generate_custom(30, &specs).expect("generate");

    assert_eq!(result.records.columns(), ["full_name", "code", "score", "signup"]);
    assert_eq!(result.report.mode, "custom");
    assert!(result.report.failed_fields.is_empty());
    for row in result.records.rows() {
        let code = row.get("code").and_then(GeneratedValue::as_str).expect("code");
        assert_eq!(code.len(), 7);
        assert_eq!(&code[2..3], "-");
        let score = row.get("score").and_then(GeneratedValue::as_i64).expect("score");
        assert!((10..=20).contains(&score));
        let signup = row.get("signup").and_then(GeneratedValue::as_date).expect("signup");
        assert!(signup >= NaiveDate::from_ymd_opt(2023, 1, 10).expect("date"));
        assert!(signup <= NaiveDate::from_ymd_opt(2024, 1, 10).expect("date"));
    }
}

#[test]
fn failing_providers_become_nulls_with_issues() {
    let specs = vec![
        FieldSpec::new("id", "uuid4"),
        FieldSpec::new("mystery", "does_not_exist"),
        FieldSpec::new("bad_range", "random_int")
            .with_kwarg("min", json!(5))
            .with_kwarg("max", json!(1)),
        FieldSpec::new("bad_kind", "random_int").with_args(vec![json!("five")]),
    ];
    let result = engine(2).generate_custom(4, &specs).expect("generate");

    assert_eq!(result.records.len(), 4);
    for row in result.records.rows() {
        assert!(row.get("id").is_some_and(|value| !value.is_null()));
        assert_eq!(row.get("mystery"), Some(&GeneratedValue::Null));
        assert_eq!(row.get("bad_range"), Some(&GeneratedValue::Null));
        assert_eq!(row.get("bad_kind"), Some(&GeneratedValue::Null));
    }

    let report = &result.report;
    assert_eq!(report.failed_fields.get("mystery"), Some(&4));
    assert_eq!(report.failed_fields.get("bad_range"), Some(&4));
    assert_eq!(report.failed_fields.get("bad_kind"), Some(&4));
    assert_eq!(report.warnings_by_code.get("unknown_provider"), Some(&4));
    assert_eq!(report.warnings_by_code.get("provider_failed"), Some(&4));
    assert_eq!(report.warnings_by_code.get("invalid_args"), Some(&4));
    assert_eq!(report.warnings.len(), 3);
    assert!(report.warnings.iter().all(|issue| issue.row == Some(0)));
}

#[test]
fn out_of_range_numeric_arguments_become_nulls() {
    let specs = vec![
        FieldSpec::new("id", "uuid4"),
        FieldSpec::new("huge_float", "pyfloat")
            .with_kwarg("min_value", json!(-1e308))
            .with_kwarg("max_value", json!(1e308)),
        FieldSpec::new("huge_amount", "amount")
            .with_kwarg("min", json!(-1e308))
            .with_kwarg("max", json!(1e308)),
        FieldSpec::new("far_start", "date_between")
            .with_kwarg("start_date", json!("--9223372036854775808d")),
        FieldSpec::new("old_age", "date_of_birth")
            .with_kwarg("minimum_age", json!(0))
            .with_kwarg("maximum_age", json!(i64::MAX)),
    ];
    let result = engine(5).generate_custom(3, &specs).expect("generate");

    assert_eq!(result.records.len(), 3);
    for row in result.records.rows() {
        assert!(row.get("id").is_some_and(|value| !value.is_null()));
        for field in ["huge_float", "huge_amount", "far_start", "old_age"] {
            assert_eq!(row.get(field), Some(&GeneratedValue::Null), "{field}");
        }
    }
    for field in ["huge_float", "huge_amount", "far_start", "old_age"] {
        assert_eq!(result.report.failed_fields.get(field), Some(&3), "{field}");
    }
    assert_eq!(result.report.warnings.len(), 4);
}

#[test]
fn custom_input_errors_fail_fast() {
    let err = engine(3)
        .generate_custom(0, &[FieldSpec::new("name", "name")])
        .expect_err("zero count");
    assert!(matches!(err, GenerationError::InvalidRequest(_)));

    let err = engine(3).generate_custom(3, &[]).expect_err("empty schema");
    assert!(matches!(err, GenerationError::InvalidRequest(_)));
}

#[test]
fn custom_runs_are_reproducible() {
    let specs = vec![
        FieldSpec::new("email", "email"),
        FieldSpec::new("amount", "pyfloat")
            .with_kwarg("min_value", json!(1.0))
            .with_kwarg("max_value", json!(5.0)),
        FieldSpec::new("when", "date_time_between"),
    ];
    let a = engine(77).generate_custom(15, &specs).expect("run a");
    let b = engine(77).generate_custom(15, &specs).expect("run b");
    assert_eq!(a.records, b.records);
    assert_eq!(a.report.seed, 77);
}

#[test]
fn field_specs_deserialize_with_defaults() {
    let spec: FieldSpec = serde_json::from_value(json!({
        "name": "pick",
        "provider": "random_element",
        "kwargs": { "elements": ["a", "b"] }
    }))
    .expect("parse spec");
    assert!(spec.args.is_empty());
    let result = engine(4).generate_custom(10, &[spec]).expect("generate");
    for row in result.records.rows() {
        let value = row.get("pick").and_then(GeneratedValue::as_str).expect("pick");
        assert!(value == "a" || value == "b");
    }
}
