use std::path::PathBuf;

use chrono::NaiveDate;

use datasynth_core::{GeneratedValue, RecordSet, Row};
use datasynth_generate::{
    EntityKind, EntityRequest, GenerateOptions, GenerationEngine, ReferenceResolver,
    ReferenceUsage,
};
use datasynth_store::{DatasetStore, StoreError};

fn engine(seed: u64) -> GenerationEngine {
    GenerationEngine::new(GenerateOptions {
        seed: Some(seed),
        base_time: NaiveDate::from_ymd_opt(2024, 9, 1).and_then(|date| date.and_hms_opt(10, 0, 0)),
        ..GenerateOptions::default()
    })
}

fn all_fields(kind: EntityKind) -> Vec<String> {
    kind.generator()
        .field_names()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn generate(kind: EntityKind, count: u64, seed: u64) -> RecordSet {
    engine(seed)
        .generate(kind, &EntityRequest::new(count, all_fields(kind)), None)
        .expect("generate records")
        .records
}

fn temp_db_path(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("datasynth_store_{label}_{}.db", uuid::Uuid::new_v4()));
    path
}

#[test]
fn persist_then_query_round_trips_every_entity() {
    let mut store = DatasetStore::in_memory().expect("open store");
    for kind in EntityKind::ALL {
        let records = generate(kind, 25, 7);
        let written = store
            .persist(kind.default_table(), &records)
            .expect("persist");
        assert_eq!(written, 25);

        let outcome = store.query(&format!("SELECT * FROM {}", kind.default_table()));
        assert!(outcome.is_ok(), "{kind}: {:?}", outcome.error);
        assert_eq!(outcome.records.len(), records.len());
        assert_eq!(outcome.records.columns(), records.columns());
        assert_eq!(outcome.records, records, "{kind}");
    }
    assert_eq!(
        store.list_tables().expect("list tables"),
        ["companies", "customers", "products", "transactions"]
    );
}

#[test]
fn persisting_again_replaces_the_table() {
    let mut store = DatasetStore::in_memory().expect("open store");
    let first = generate(EntityKind::Product, 10, 1);
    let second = engine(2)
        .generate(EntityKind::Product, &EntityRequest::new(3, ["sku", "price"]), None)
        .expect("generate")
        .records;

    store.persist("products", &first).expect("persist first");
    store.persist("products", &second).expect("persist second");

    let outcome = store.query("SELECT * FROM products");
    assert_eq!(outcome.records, second);
    assert_eq!(outcome.records.columns(), ["sku", "price"]);
}

#[test]
fn failed_persist_keeps_previous_contents() {
    let mut store = DatasetStore::in_memory().expect("open store");
    let records = generate(EntityKind::Company, 5, 3);
    store.persist("companies", &records).expect("persist");

    let err = store
        .persist("companies", &RecordSet::new())
        .expect_err("empty record set");
    assert!(matches!(err, StoreError::InvalidInput(_)));
    assert!(store.persist("", &records).is_err());

    assert_eq!(store.read_table("companies").expect("read"), records);
}

#[test]
fn persist_failing_after_drop_rolls_back() {
    let mut store = DatasetStore::in_memory().expect("open store");
    let mut original = Row::new();
    original.insert("id", GeneratedValue::Int(1));
    let original = RecordSet::from_rows(vec![original]);
    store.persist("contacts", &original).expect("persist");

    let mut colliding = Row::new();
    colliding.insert("Email", GeneratedValue::text("a@example.com"));
    colliding.insert("email", GeneratedValue::text("b@example.com"));
    let err = store
        .persist("contacts", &RecordSet::from_rows(vec![colliding]))
        .expect_err("case-colliding columns");
    assert!(matches!(err, StoreError::Sqlite(_)));
    assert!(err.to_string().contains("duplicate column name"));

    let outcome = store.query("SELECT * FROM contacts");
    assert!(outcome.is_ok());
    assert_eq!(outcome.records, original);
    assert_eq!(outcome.records.columns(), ["id"]);
}

#[test]
fn resolver_deduplicates_large_tables_in_first_seen_order() {
    let mut store = DatasetStore::in_memory().expect("open store");
    let rows: Vec<Row> = (0..20_000_i64)
        .map(|idx| {
            let mut row = Row::new();
            row.insert("customer_id", GeneratedValue::Int(idx * 7919 % 5_000));
            row
        })
        .collect();
    store
        .persist("customers", &RecordSet::from_rows(rows))
        .expect("persist");

    let keys = store.resolve("customers", "customer_id").expect("keys");
    let expected: Vec<GeneratedValue> = (0..5_000_i64)
        .map(|idx| GeneratedValue::Int(idx * 7919 % 5_000))
        .collect();
    assert_eq!(keys, expected);
}

#[test]
fn query_failures_yield_empty_outcomes() {
    let store = DatasetStore::in_memory().expect("open store");
    let outcome = store.query("SELECT * FROM missing_table");
    assert!(!outcome.is_ok());
    assert!(outcome.records.is_empty());
    assert!(outcome.error.is_some_and(|message| message.contains("missing_table")));

    let outcome = store.query("SELEKT nonsense");
    assert!(outcome.error.is_some());
    assert!(outcome.records.is_empty());
}

#[test]
fn queries_decode_declared_types_and_expressions() {
    let mut store = DatasetStore::in_memory().expect("open store");
    let mut row = Row::new();
    row.insert("name", GeneratedValue::text("Ada"));
    row.insert("active", GeneratedValue::Bool(true));
    row.insert("score", GeneratedValue::Float(3.0));
    row.insert(
        "joined",
        GeneratedValue::Date(NaiveDate::from_ymd_opt(2021, 4, 5).expect("date")),
    );
    row.insert("note", GeneratedValue::Null);
    store
        .persist("weird \"name\"", &RecordSet::from_rows(vec![row.clone()]))
        .expect("persist");

    let outcome = store.query("SELECT * FROM \"weird \"\"name\"\"\"");
    assert_eq!(outcome.records.rows(), [row]);

    let outcome = store.query("SELECT COUNT(*) AS total FROM \"weird \"\"name\"\"\"");
    assert_eq!(
        outcome.records.rows()[0].get("total"),
        Some(&GeneratedValue::Int(1))
    );
}

#[test]
fn resolver_reflects_current_tables() {
    let mut store = DatasetStore::in_memory().expect("open store");
    assert!(store.resolve("customers", "customer_id").is_none());

    let customers = generate(EntityKind::Customer, 6, 4);
    store.persist("customers", &customers).expect("persist");
    let keys = store
        .resolve("customers", "customer_id")
        .expect("keys available");
    assert_eq!(keys, customers.column_values("customer_id"));
    assert!(store.resolve("customers", "no_such_column").is_none());

    let request = EntityRequest::new(30, ["customer_id", "amount"])
        .with_reference("customers", "customers");
    let result = engine(9)
        .generate(EntityKind::Transaction, &request, Some(&store))
        .expect("transactions");
    assert!(matches!(
        result.report.reference_usage.get("customers"),
        Some(ReferenceUsage::Sampled { keys: 6, .. })
    ));
    for row in result.records.rows() {
        assert!(keys.contains(row.get("customer_id").expect("customer id")));
    }
}

#[test]
fn file_store_persists_across_handles() {
    let path = temp_db_path("file");
    let records = generate(EntityKind::Customer, 4, 12);
    {
        let mut store = DatasetStore::open(&path).expect("open file store");
        store.persist("customers", &records).expect("persist");
    }
    let store = DatasetStore::open(&path).expect("reopen file store");
    assert_eq!(store.read_table("customers").expect("read"), records);
    assert!(matches!(
        store.read_table("nope"),
        Err(StoreError::TableNotFound(_))
    ));
    let _ = std::fs::remove_file(&path);
}
