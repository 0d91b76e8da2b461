//! Storage sink for generated datasets.
//!
//! Record sets are persisted as named tables in an embedded SQLite file,
//! queried back with plain SQL, served as reference keys to the generators,
//! and bulk-copied to PostgreSQL destinations.

pub mod destination;
pub mod error;
pub mod postgres;
pub mod schema;
pub mod sqlite;

pub use destination::{Destination, bulk_copy};
pub use error::{Result, StoreError};
pub use postgres::PostgresDestination;
pub use schema::{ColumnType, quote_ident};
pub use sqlite::{DatasetStore, QueryOutcome};
