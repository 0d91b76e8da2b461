use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use datasynth_generate::output::{ExportFormat, export_to_path};
use datasynth_generate::{EntityKind, EntityRequest, GenerateOptions, GenerationEngine};

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("datasynth_generate_{label}_{}", uuid::Uuid::new_v4()));
    dir
}

fn companies() -> datasynth_core::RecordSet {
    let engine = GenerationEngine::new(GenerateOptions {
        seed: Some(31),
        base_time: NaiveDate::from_ymd_opt(2024, 5, 1).and_then(|date| date.and_hms_opt(0, 0, 0)),
        ..GenerateOptions::default()
    });
    let request = EntityRequest::new(
        12,
        ["company_id", "company_name", "social_media", "founded_date"],
    );
    engine
        .generate(EntityKind::Company, &request, None)
        .expect("generate companies")
        .records
}

#[test]
fn csv_export_writes_header_and_rows() {
    let records = companies();
    let path = temp_out_dir("csv").join("nested").join("companies.csv");
    let bytes = export_to_path(&records, &path, ExportFormat::Csv).expect("export csv");

    let contents = fs::read_to_string(&path).expect("read csv");
    assert_eq!(bytes, contents.len() as u64);

    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["company_id", "company_name", "social_media", "founded_date"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.expect("row")).collect();
    assert_eq!(rows.len(), 12);
    for row in &rows {
        let social: serde_json::Value =
            serde_json::from_str(&row[2]).expect("social media renders as json");
        assert!(social.get("twitter").is_some());
        assert!(NaiveDate::parse_from_str(&row[3], "%Y-%m-%d").is_ok());
    }
}

#[test]
fn json_export_writes_array_of_objects() {
    let records = companies();
    let path = temp_out_dir("json").join("companies.json");
    export_to_path(&records, &path, ExportFormat::Json).expect("export json");

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read json")).expect("parse json");
    let rows = parsed.as_array().expect("array");
    assert_eq!(rows.len(), 12);
    for row in rows {
        let object = row.as_object().expect("object");
        assert_eq!(object.len(), 4);
        assert!(object["social_media"].is_object());
        assert!(object["founded_date"].is_string());
    }
    assert_eq!(ExportFormat::Json.extension(), "json");
}
