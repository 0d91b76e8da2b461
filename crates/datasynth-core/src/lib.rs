//! Core contracts shared by the datasynth crates.
//!
//! Defines the generated value model, rows and record sets, the shared error
//! type, and destination credential handling.

pub mod error;
pub mod record;
pub mod redaction;
pub mod value;

pub use error::{Error, Result};
pub use record::{RecordSet, Row};
pub use redaction::DestinationCredentials;
pub use value::{DATE_FORMAT, GeneratedValue, TIMESTAMP_FORMAT, ValueKind, round_to};
