use async_trait::async_trait;
use tracing::info;

use datasynth_core::RecordSet;

use crate::error::{Result, StoreError};
use crate::sqlite::DatasetStore;

/// A database that persisted tables can be copied into.
#[async_trait]
pub trait Destination: Send + Sync {
    /// Engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Creates `table` when absent and appends every row of `records`.
    ///
    /// Implementations apply the copy atomically: on error nothing is left behind.
    async fn copy_table(&self, table: &str, records: &RecordSet) -> Result<u64>;
}

/// Copies every row of `table` from the embedded store into `destination`.
pub async fn bulk_copy(
    store: &DatasetStore,
    table: &str,
    destination: &dyn Destination,
) -> Result<u64> {
    let records = store.read_table(table)?;
    if records.is_empty() {
        return Err(StoreError::EmptyTable(table.to_string()));
    }
    info!(
        table = %table,
        rows = records.len(),
        engine = destination.engine(),
        "bulk copy started"
    );
    let copied = destination.copy_table(table, &records).await?;
    info!(table = %table, rows = copied, engine = destination.engine(), "bulk copy completed");
    Ok(copied)
}
