use std::path::Path;
use std::time::Instant;

use rusqlite::{Connection, OptionalExtension, params_from_iter};
use tracing::{debug, info, warn};

use datasynth_core::{GeneratedValue, RecordSet, Row};
use datasynth_generate::ReferenceResolver;

use crate::error::{Result, StoreError};
use crate::schema::{ColumnType, infer_columns, quote_ident};

/// Result of a pass-through query. Failures carry their message and no rows.
#[derive(Debug, Clone, Default)]
pub struct QueryOutcome {
    pub records: RecordSet,
    pub error: Option<String>,
}

impl QueryOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Named tables of generated records in an embedded SQLite database.
#[derive(Debug)]
pub struct DatasetStore {
    conn: Connection,
}

impl DatasetStore {
    /// Opens (or creates) the database file. `:memory:` opens a private in-memory database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "dataset store opened");
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Replaces `table` with the contents of `records`.
    ///
    /// Drop, create and inserts share one transaction, so a failure leaves
    /// the previous table untouched.
    pub fn persist(&mut self, table: &str, records: &RecordSet) -> Result<u64> {
        let start = Instant::now();
        let table_ident = quote_ident(table)?;
        if records.is_empty() || records.columns().is_empty() {
            return Err(StoreError::InvalidInput(format!(
                "refusing to persist an empty record set as '{table}'"
            )));
        }

        let columns = infer_columns(records);
        let mut definitions = Vec::with_capacity(columns.len());
        for (name, column_type) in &columns {
            definitions.push(format!("{} {}", quote_ident(name)?, column_type.decl()));
        }
        let placeholders: Vec<String> = (1..=columns.len()).map(|idx| format!("?{idx}")).collect();
        let insert_sql = format!(
            "INSERT INTO {table_ident} VALUES ({})",
            placeholders.join(", ")
        );

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {table_ident}"), [])?;
        tx.execute(
            &format!("CREATE TABLE {table_ident} ({})", definitions.join(", ")),
            [],
        )?;
        let mut written = 0_u64;
        {
            let mut stmt = tx.prepare(&insert_sql)?;
            for row in records.rows() {
                let values = columns
                    .iter()
                    .map(|(name, column_type)| column_type.encode(records.cell(row, name)));
                stmt.execute(params_from_iter(values))?;
                written += 1;
            }
        }
        tx.commit()?;

        info!(
            table = %table,
            rows = written,
            columns = columns.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "table persisted"
        );
        Ok(written)
    }

    /// Runs `sql` and returns its rows. Errors never escape: they are logged
    /// and reported in the outcome alongside an empty record set.
    pub fn query(&self, sql: &str) -> QueryOutcome {
        match self.try_query(sql) {
            Ok(records) => QueryOutcome {
                records,
                error: None,
            },
            Err(err) => {
                warn!(error = %err, "query failed");
                QueryOutcome {
                    records: RecordSet::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub fn try_query(&self, sql: &str) -> Result<RecordSet> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<(String, Option<ColumnType>)> = stmt
            .columns()
            .iter()
            .map(|column| {
                (
                    column.name().to_string(),
                    column.decl_type().and_then(ColumnType::from_decl),
                )
            })
            .collect();

        let mut records =
            RecordSet::with_columns(columns.iter().map(|(name, _)| name.clone()).collect());
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut record = Row::with_capacity(columns.len());
            for (idx, (name, column_type)) in columns.iter().enumerate() {
                let value = ColumnType::decode(*column_type, row.get_ref(idx)?);
                record.insert(name.clone(), value);
            }
            records.push(record);
        }
        debug!(rows = records.len(), "query executed");
        Ok(records)
    }

    /// User tables, sorted by name.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Every row of `table` in insertion order.
    pub fn read_table(&self, table: &str) -> Result<RecordSet> {
        let table_ident = quote_ident(table)?;
        if !self.table_exists(table)? {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        self.try_query(&format!("SELECT * FROM {table_ident} ORDER BY rowid"))
    }

    fn distinct_keys(&self, table: &str, key_column: &str) -> Result<Vec<GeneratedValue>> {
        let sql = format!(
            "SELECT {column} FROM {table} WHERE {column} IS NOT NULL \
             GROUP BY {column} ORDER BY MIN(rowid)",
            column = quote_ident(key_column)?,
            table = quote_ident(table)?,
        );
        let keys = self
            .try_query(&sql)?
            .into_rows()
            .into_iter()
            .filter_map(|row| row.get(key_column).cloned())
            .collect();
        Ok(keys)
    }
}

/// Reads keys from the current table contents on every call.
impl ReferenceResolver for DatasetStore {
    fn resolve(&self, table: &str, key_column: &str) -> Option<Vec<GeneratedValue>> {
        match self.table_exists(table) {
            Ok(true) => {}
            Ok(false) => {
                debug!(table = %table, "reference table not found");
                return None;
            }
            Err(err) => {
                warn!(table = %table, error = %err, "reference lookup failed");
                return None;
            }
        }
        match self.distinct_keys(table, key_column) {
            Ok(keys) if !keys.is_empty() => Some(keys),
            Ok(_) => None,
            Err(err) => {
                warn!(
                    table = %table,
                    column = %key_column,
                    error = %err,
                    "reference lookup failed"
                );
                None
            }
        }
    }
}
