use std::env;

use anyhow::{Context, Result};
use sqlx::Row as _;
use sqlx::postgres::PgPoolOptions;

use datasynth_core::DestinationCredentials;
use datasynth_generate::{EntityKind, EntityRequest, GenerateOptions, GenerationEngine};
use datasynth_store::{DatasetStore, PostgresDestination, StoreError, bulk_copy};

fn database_url() -> Option<String> {
    env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .ok()
}

#[tokio::test]
async fn bulk_copy_creates_text_table_and_inserts_rows() -> Result<()> {
    let Some(url) = database_url() else {
        eprintln!("skipping: set TEST_DATABASE_URL or DATABASE_URL to run");
        return Ok(());
    };
    let credentials = DestinationCredentials::from_url(&url)?;

    let engine = GenerationEngine::new(GenerateOptions {
        seed: Some(5),
        ..GenerateOptions::default()
    });
    let records = engine
        .generate(
            EntityKind::Product,
            &EntityRequest::new(40, ["product_id", "price", "created_date", "is_active"]),
            None,
        )?
        .records;

    let table = format!("datasynth_copy_{}", uuid::Uuid::new_v4().simple());
    let mut store = DatasetStore::in_memory()?;
    store.persist(&table, &records)?;

    let destination = PostgresDestination::new(credentials).with_batch_rows(7);
    let copied = bulk_copy(&store, &table, &destination).await?;
    assert_eq!(copied, 40);

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .context("connecting to Postgres")?;
    let count: i64 = sqlx::query(&format!("SELECT COUNT(*) FROM \"{table}\""))
        .fetch_one(&pool)
        .await?
        .try_get(0)?;
    assert_eq!(count, 40);

    let types: Vec<String> = sqlx::query(
        "SELECT data_type FROM information_schema.columns WHERE table_name = $1",
    )
    .bind(&table)
    .fetch_all(&pool)
    .await?
    .into_iter()
    .map(|row| row.try_get::<String, _>(0))
    .collect::<Result<_, _>>()?;
    assert_eq!(types.len(), 4);
    assert!(types.iter().all(|data_type| data_type == "text"));

    sqlx::query(&format!("DROP TABLE \"{table}\"")).execute(&pool).await?;
    Ok(())
}

#[tokio::test]
async fn bulk_copy_rejects_missing_tables_before_connecting() -> Result<()> {
    let store = DatasetStore::in_memory()?;
    let destination = PostgresDestination::new(DestinationCredentials::new(
        "127.0.0.1",
        1,
        "none",
        "none",
        "",
    ));
    let err = bulk_copy(&store, "never_persisted", &destination)
        .await
        .expect_err("missing table");
    assert!(matches!(err, StoreError::TableNotFound(_)));
    Ok(())
}
