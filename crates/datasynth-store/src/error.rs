use thiserror::Error;

/// Errors returned by the storage sink and its destinations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("table '{0}' does not exist")]
    TableNotFound(String),
    #[error("table '{0}' has no rows")]
    EmptyTable(String),
    #[error("embedded store error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Connection or write failure on a destination database.
    #[error("destination error: {0}")]
    Destination(#[from] sqlx::Error),
    #[error(transparent)]
    Core(#[from] datasynth_core::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
