use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Postgres, QueryBuilder};
use tracing::{debug, warn};

use datasynth_core::{DestinationCredentials, RecordSet};

use crate::destination::Destination;
use crate::error::{Result, StoreError};
use crate::schema::quote_ident;

/// Bind parameter limit of the PostgreSQL wire protocol.
const MAX_BIND_PARAMS: usize = 65_535;

/// PostgreSQL destination. Every column is created as `TEXT`.
#[derive(Debug, Clone)]
pub struct PostgresDestination {
    credentials: DestinationCredentials,
    batch_rows: usize,
}

impl PostgresDestination {
    pub fn new(credentials: DestinationCredentials) -> Self {
        Self {
            credentials,
            batch_rows: 1_000,
        }
    }

    /// Rows per `INSERT`; capped so a batch stays under the bind parameter limit.
    pub fn with_batch_rows(mut self, batch_rows: usize) -> Self {
        self.batch_rows = batch_rows.max(1);
        self
    }

    pub fn credentials(&self) -> &DestinationCredentials {
        &self.credentials
    }

    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.credentials.host)
            .port(self.credentials.port)
            .database(&self.credentials.database)
            .username(&self.credentials.user)
            .password(&self.credentials.password)
    }

    fn rows_per_batch(&self, columns: usize) -> usize {
        let limit = MAX_BIND_PARAMS / columns.max(1);
        self.batch_rows.min(limit).max(1)
    }
}

#[async_trait]
impl Destination for PostgresDestination {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn copy_table(&self, table: &str, records: &RecordSet) -> Result<u64> {
        let start = Instant::now();
        let columns = records.columns();
        if columns.is_empty() {
            return Err(StoreError::EmptyTable(table.to_string()));
        }
        let table_ident = quote_ident(table)?;
        let mut column_idents = Vec::with_capacity(columns.len());
        for column in columns {
            column_idents.push(quote_ident(column)?);
        }
        let definitions: Vec<String> = column_idents
            .iter()
            .map(|ident| format!("{ident} TEXT"))
            .collect();

        debug!(destination = %self.credentials, table = %table, "connecting to destination");
        let mut conn = PgConnection::connect_with(&self.connect_options()).await?;
        let mut tx = conn.begin().await?;

        let create_sql = format!(
            "CREATE TABLE IF NOT EXISTS {table_ident} ({})",
            definitions.join(", ")
        );
        sqlx::query(&create_sql).execute(&mut *tx).await?;

        let insert_prefix = format!("INSERT INTO {table_ident} ({}) ", column_idents.join(", "));
        let mut copied = 0_u64;
        for chunk in records.rows().chunks(self.rows_per_batch(columns.len())) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(insert_prefix.as_str());
            builder.push_values(chunk, |mut values, row| {
                for column in columns {
                    values.push_bind(records.cell(row, column).to_optional_text());
                }
            });
            let result = builder.build().execute(&mut *tx).await;
            match result {
                Ok(done) => copied += done.rows_affected(),
                Err(err) => {
                    warn!(
                        destination = %self.credentials,
                        table = %table,
                        error = %err,
                        "destination insert failed; rolling back"
                    );
                    tx.rollback().await?;
                    return Err(err.into());
                }
            }
        }

        tx.commit().await?;
        conn.close().await?;
        debug!(
            destination = %self.credentials,
            table = %table,
            rows = copied,
            duration_ms = start.elapsed().as_millis() as u64,
            "destination copy committed"
        );
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination() -> PostgresDestination {
        PostgresDestination::new(DestinationCredentials::new(
            "localhost",
            5432,
            "synthetic",
            "writer",
            "hunter2",
        ))
    }

    #[test]
    fn batches_respect_bind_limit() {
        let destination = destination();
        assert_eq!(destination.rows_per_batch(4), 1_000);
        assert_eq!(destination.rows_per_batch(100), 655);
        assert_eq!(destination.rows_per_batch(70_000), 1);
        assert_eq!(destination.clone().with_batch_rows(0).rows_per_batch(3), 1);
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", destination());
        assert!(!rendered.contains("hunter2"));
    }
}
